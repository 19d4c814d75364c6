//! Decoded Record Type

use serde::{Deserialize, Serialize};

/// One decoded fact derived from a raw frame
///
/// Ephemeral: computed on demand from a `RawFrame`, never stored as a
/// second source of truth. The CSV log and the API both serialize this
/// shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    /// Arbitration id as lowercase hex ("0x2c2")
    pub id: String,
    /// Human-readable label for the fact
    pub label: String,
    /// Decoded value, or the raw hex payload when no rule applied
    pub value: String,
    /// Timestamp of the source frame (fractional seconds)
    pub timestamp: f64,
}

impl DecodedRecord {
    /// Create a record for the given source id and timestamp
    pub fn new(id: u32, label: impl Into<String>, value: impl Into<String>, timestamp: f64) -> Self {
        Self {
            id: format!("{:#x}", id),
            label: label.into(),
            value: value.into(),
            timestamp,
        }
    }
}
