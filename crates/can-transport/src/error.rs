//! Transport Error Types

use thiserror::Error;

/// Errors that can occur on the CAN transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Interface could not be opened at startup (fatal)
    #[error("Failed to open CAN interface {interface}: {source}")]
    Init {
        interface: String,
        #[source]
        source: std::io::Error,
    },

    /// A single receive failed (recoverable, the ingestion loop retries)
    #[error("CAN receive error: {0}")]
    Recv(#[source] std::io::Error),

    /// A single send failed (surfaced to the command path)
    #[error("CAN send failed: {0}")]
    SendFailed(String),

    /// Arbitration id outside the 11/29-bit range
    #[error("Invalid arbitration id {0:#x}")]
    InvalidId(u32),

    /// Transport closed; no further frames will arrive
    #[error("CAN transport closed")]
    Closed,
}
