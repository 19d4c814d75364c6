//! LED Toggle Route

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::error;

use crate::AppState;

/// Toggle the LED over the bus
///
/// 204 on success, 500 with a plain-text reason when the send fails.
/// A failed send mutates nothing.
pub async fn toggle(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match can_ingest::toggle_led(&state.bus, &state.vehicle, &state.ids).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("LED toggle failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "CAN send failed").into_response()
        }
    }
}
