//! CAN Dashboard API Server
//!
//! The query/command surface over the ingestion pipeline: decoded
//! history out, LED toggle in, plus a health route. The web layer is
//! deliberately thin; everything interesting happens in the pipeline
//! crates.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod routes;

pub use config::AppConfig;

use can_ingest::{BusIds, FrameSource, VehicleState};
use can_transport::{CanBus, EdgeTrigger};
use frame_history::HistoryBuffer;
use frame_log::CsvLogger;

/// Application state shared across handlers
pub struct AppState {
    /// Raw frame history, shared with the ingestion task
    pub history: Arc<HistoryBuffer>,
    /// Derived vehicle state (LED, airbag watchdog)
    pub vehicle: Arc<VehicleState>,
    /// Bus handle for the command path
    pub bus: Arc<CanBus>,
    /// Designated ids for the command path
    pub ids: BusIds,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/can", get(routes::can::get_history))
        .route("/api/led", post(routes::led::toggle))
        .route("/api/health", get(routes::health::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging (RUST_LOG overrides the default "info")
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Open the bus, spawn ingestion, and serve until shutdown
///
/// `edge` supplies the falling-edge source for notification mode;
/// callers without one pass `None` and the source falls back to
/// polling.
pub async fn run(config: AppConfig, edge: Option<EdgeTrigger>) -> anyhow::Result<()> {
    let bus = Arc::new(CanBus::open(&config.ingest.interface)?);
    let history = Arc::new(HistoryBuffer::new(config.history_capacity));
    let vehicle = Arc::new(VehicleState::new());

    // Persistence is best-effort: a sink that cannot be opened only
    // disables the CSV log, never the dashboard
    let logger = match CsvLogger::create(&config.log_path) {
        Ok(logger) => Some(Arc::new(logger)),
        Err(e) => {
            warn!("CSV log disabled: {}", e);
            None
        }
    };

    let mut source = FrameSource::new(
        Arc::clone(&bus),
        Arc::clone(&history),
        Arc::clone(&vehicle),
        config.ingest.clone(),
    );
    if let Some(logger) = &logger {
        source = source.with_logger(Arc::clone(logger));
    }
    if let Some(edge) = edge {
        source = source.with_edge_trigger(edge);
    }
    tokio::spawn(source.run());

    let state = Arc::new(AppState {
        history,
        vehicle,
        bus,
        ids: config.ingest.ids,
        version: env!("CARGO_PKG_VERSION").to_string(),
        start_time: Instant::now(),
    });
    let app = create_router(state);

    info!("Starting API server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use can_transport::{MockBusHandle, RawFrame};
    use frame_decoder::DecodedRecord;
    use tower::ServiceExt;

    fn test_state() -> (Arc<AppState>, MockBusHandle) {
        let (bus, handle) = CanBus::mock();
        let state = Arc::new(AppState {
            history: Arc::new(HistoryBuffer::new(100)),
            vehicle: Arc::new(VehicleState::new()),
            bus: Arc::new(bus),
            ids: BusIds::default(),
            version: "test".to_string(),
            start_time: Instant::now(),
        });
        (state, handle)
    }

    #[tokio::test]
    async fn test_get_can_returns_decoded_history_newest_last() {
        let (state, _handle) = test_state();
        state
            .history
            .push(RawFrame::with_timestamp(0x140, &[0x0A, 0x00], 1.0));
        state
            .history
            .push(RawFrame::with_timestamp(0x171, &[0x01], 2.0));

        let app = create_router(Arc::clone(&state));
        let response = app
            .oneshot(Request::builder().uri("/api/can").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let records: Vec<DecodedRecord> = serde_json::from_slice(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "0x140");
        assert_eq!(records[0].value, "10.0 °C");
        assert_eq!(records[1].id, "0x171");
        assert_eq!(records[1].value, "LED On");
    }

    #[tokio::test]
    async fn test_post_led_toggles_and_returns_no_content() {
        let (state, handle) = test_state();
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/led")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let sent = handle.sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, 0x170);
        assert_eq!(sent[0].data, vec![1]);
        assert_eq!(state.vehicle.led(), 1);
    }

    #[tokio::test]
    async fn test_post_led_send_failure_returns_500() {
        let (state, handle) = test_state();
        handle.fail_sends(true);
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/led")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&body), "CAN send failed");
        assert_eq!(state.vehicle.led(), 0);
    }

    #[tokio::test]
    async fn test_health_reports_buffer_and_airbag() {
        let (state, _handle) = test_state();
        state
            .vehicle
            .observe(&RawFrame::with_timestamp(0x050, &[0x64, 0x07], 1.0), &state.ids);

        let app = create_router(Arc::clone(&state));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["buffer"]["capacity"], 100);
        assert_eq!(health["airbag"]["life_counter"], 7);
    }
}
