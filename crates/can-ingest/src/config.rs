//! Ingestion Configuration

use serde::{Deserialize, Serialize};

/// How the frame source waits for frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
    /// Blocking receive with a bounded timeout, retried forever
    Polling,
    /// Wait for a falling-edge interrupt, then one short receive
    Notification,
}

/// Designated arbitration ids the tracker and command path act on
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BusIds {
    /// Outbound LED control frames
    pub led_control: u32,
    /// Inbound LED status frames
    pub led_status: u32,
    /// Inbound airbag / SRS frames carrying the life counter
    pub airbag: u32,
}

impl Default for BusIds {
    fn default() -> Self {
        Self {
            led_control: 0x170,
            led_status: 0x171,
            airbag: 0x050,
        }
    }
}

/// Frame source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// CAN interface name
    pub interface: String,
    /// Ingestion strategy
    pub mode: IngestMode,
    /// Receive timeout for polling mode, in milliseconds
    pub receive_timeout_ms: u64,
    /// Designated ids
    pub ids: BusIds,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            interface: "can0".to_string(),
            mode: IngestMode::Polling,
            receive_timeout_ms: 500,
            ids: BusIds::default(),
        }
    }
}
