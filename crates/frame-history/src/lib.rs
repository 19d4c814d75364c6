//! Frame History Buffer
//!
//! Keeps the most recent N raw frames for the query surface. One
//! producer (the ingestion task) pushes, any number of readers take
//! snapshots.

mod buffer;

pub use buffer::HistoryBuffer;
