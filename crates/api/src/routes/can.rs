//! Decoded History Route

use axum::{extract::State, Json};
use frame_decoder::DecodedRecord;
use std::sync::Arc;

use crate::AppState;

/// Get the decoded frame history, arrival order, newest-last
///
/// Decoding runs on a snapshot copy; the buffer lock is never held
/// while records are built or serialized.
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<DecodedRecord>> {
    let snapshot = state.history.snapshot();
    let records = snapshot
        .iter()
        .flat_map(frame_decoder::decode_frame)
        .collect();
    Json(records)
}
