//! Raw CAN Frame

use serde::{Deserialize, Serialize};

/// A single CAN frame as received from (or submitted to) the bus
///
/// Immutable once constructed: the ingestion loop builds one per
/// successful receive and nothing downstream ever mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    /// Arbitration id (11-bit standard or 29-bit extended)
    pub id: u32,
    /// Payload bytes (0-8)
    pub data: Vec<u8>,
    /// Receive time as fractional seconds since the Unix epoch
    pub timestamp: f64,
}

impl RawFrame {
    /// Create a frame stamped with the current wall-clock time
    pub fn new(id: u32, data: &[u8]) -> Self {
        Self::with_timestamp(id, data, now_timestamp())
    }

    /// Create a frame with an explicit timestamp
    pub fn with_timestamp(id: u32, data: &[u8], timestamp: f64) -> Self {
        Self {
            id,
            data: data.to_vec(),
            timestamp,
        }
    }

    /// Arbitration id as a lowercase hex string ("0x2c2")
    pub fn id_hex(&self) -> String {
        format!("{:#x}", self.id)
    }

    /// Payload as a lowercase hex string without separators
    pub fn data_hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Number of payload bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch
pub(crate) fn now_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
