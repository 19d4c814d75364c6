//! Health Route

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub buffer: BufferStatus,
    pub led_state: u8,
    pub airbag: AirbagStatus,
}

/// History buffer statistics
#[derive(Debug, Serialize)]
pub struct BufferStatus {
    pub len: usize,
    pub capacity: usize,
    pub total_frames: u64,
}

/// Airbag watchdog status (informational only)
#[derive(Debug, Serialize)]
pub struct AirbagStatus {
    pub life_counter: Option<u8>,
    pub seconds_since_change: Option<f64>,
}

/// Health check handler
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        buffer: BufferStatus {
            len: state.history.len(),
            capacity: state.history.capacity(),
            total_frames: state.history.total_pushed(),
        },
        led_state: state.vehicle.led(),
        airbag: AirbagStatus {
            life_counter: state.vehicle.airbag_life_counter(),
            seconds_since_change: state
                .vehicle
                .airbag_staleness()
                .map(|d| d.as_secs_f64()),
        },
    })
}
