//! CSV Frame Log
//!
//! Best-effort append-only persistence for decoded records. A failure
//! to append is reported to the caller, logged there, and never
//! interrupts ingestion or the in-memory history.

mod writer;

pub use writer::CsvLogger;

use thiserror::Error;

/// Persistence errors (recoverable, best-effort)
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("CSV log I/O error: {0}")]
    Io(#[from] std::io::Error),
}
