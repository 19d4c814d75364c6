//! CAN Bus Transport
//!
//! Wraps a SocketCAN socket behind a small receive/send surface with
//! bounded receive timeouts and serialized sends. A built-in mock mode
//! allows the rest of the pipeline to be tested without hardware.

mod bus;
mod error;
mod frame;
mod trigger;

pub use bus::{CanBus, MockBusHandle};
pub use error::TransportError;
pub use frame::RawFrame;
pub use trigger::{edge_channel, EdgeSender, EdgeTrigger};
