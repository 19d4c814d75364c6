//! CAN Ingestion
//!
//! Runs the frame source loop in the background, maintains the
//! derived vehicle state (LED, airbag watchdog), and provides the LED
//! toggle command path.

mod command;
mod config;
mod source;
mod state;

pub use command::toggle_led;
pub use config::{BusIds, IngestConfig, IngestMode};
pub use source::FrameSource;
pub use state::VehicleState;
