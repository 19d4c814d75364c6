//! Application Configuration
//!
//! Loaded from an optional `candash.toml` in the working directory,
//! overridable with `CANDASH_*` environment variables. Every option
//! has a default so the dashboard runs with no config file at all.

use can_ingest::IngestConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frame source options (interface, mode, timeout, ids)
    pub ingest: IngestConfig,
    /// History buffer capacity in frames
    pub history_capacity: usize,
    /// CSV log path
    pub log_path: String,
    /// HTTP bind address
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ingest: IngestConfig::default(),
            history_capacity: 100,
            log_path: "logs/can_log.csv".to_string(),
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment sources
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("candash").required(false))
            .add_source(config::Environment::with_prefix("CANDASH").separator("__"))
            .build()?
            .try_deserialize()
    }
}
