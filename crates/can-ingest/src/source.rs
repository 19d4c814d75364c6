//! Frame Source Loop
//!
//! One long-running task that drains the bus and feeds everything
//! downstream: derived state, history buffer, CSV log. Per-frame
//! failures are logged and the loop continues; only a closed transport
//! ends it.

use crate::config::{IngestConfig, IngestMode};
use crate::state::VehicleState;
use can_transport::{CanBus, EdgeTrigger, RawFrame, TransportError};
use frame_history::HistoryBuffer;
use frame_log::CsvLogger;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Backoff after a failed receive
const ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Receive timeout after an edge wake; no frame by then is a spurious
/// wake
const NOTIFY_RECV_TIMEOUT: Duration = Duration::from_millis(50);

/// Background ingestion task
pub struct FrameSource {
    bus: Arc<CanBus>,
    history: Arc<HistoryBuffer>,
    state: Arc<VehicleState>,
    logger: Option<Arc<CsvLogger>>,
    edge: Option<EdgeTrigger>,
    config: IngestConfig,
}

impl FrameSource {
    /// Create a frame source over an open bus
    pub fn new(
        bus: Arc<CanBus>,
        history: Arc<HistoryBuffer>,
        state: Arc<VehicleState>,
        config: IngestConfig,
    ) -> Self {
        Self {
            bus,
            history,
            state,
            logger: None,
            edge: None,
            config,
        }
    }

    /// Attach the CSV persistence sink
    pub fn with_logger(mut self, logger: Arc<CsvLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Attach the edge source for notification mode
    pub fn with_edge_trigger(mut self, trigger: EdgeTrigger) -> Self {
        self.edge = Some(trigger);
        self
    }

    /// Run the ingestion loop until the transport or edge source closes
    pub async fn run(mut self) {
        match (self.config.mode, self.edge.take()) {
            (IngestMode::Notification, Some(edge)) => self.run_notification(edge).await,
            (IngestMode::Notification, None) => {
                warn!("notification mode selected but no edge source wired, polling instead");
                self.run_polling().await;
            }
            (IngestMode::Polling, _) => self.run_polling().await,
        }
        info!("ingestion stopped");
    }

    async fn run_polling(&self) {
        let timeout = Duration::from_millis(self.config.receive_timeout_ms.max(1));
        info!(
            interface = self.bus.interface(),
            timeout_ms = timeout.as_millis() as u64,
            "ingestion started (polling)"
        );

        loop {
            match self.bus.recv(timeout).await {
                Ok(Some(frame)) => self.handle_frame(frame),
                // Timeout with no frame is not an error
                Ok(None) => {}
                Err(TransportError::Closed) => break,
                Err(e) => {
                    warn!("CAN receive error: {}", e);
                    tokio::time::sleep(ERROR_BACKOFF).await;
                }
            }
        }
    }

    async fn run_notification(&self, mut edge: EdgeTrigger) {
        info!(
            interface = self.bus.interface(),
            "ingestion started (notification)"
        );

        while edge.wait().await.is_some() {
            match self.bus.recv(NOTIFY_RECV_TIMEOUT).await {
                Ok(Some(frame)) => self.handle_frame(frame),
                // Edge fired but no frame arrived: spurious wake
                Ok(None) => debug!("spurious edge wake"),
                Err(TransportError::Closed) => break,
                Err(e) => {
                    warn!("CAN receive error: {}", e);
                    tokio::time::sleep(ERROR_BACKOFF).await;
                }
            }
        }
    }

    fn handle_frame(&self, frame: RawFrame) {
        self.state.observe(&frame, &self.config.ids);
        debug!(id = %frame.id_hex(), data = %frame.data_hex(), "frame received");

        if let Some(logger) = &self.logger {
            for record in frame_decoder::decode_frame(&frame) {
                if let Err(e) = logger.append(&record) {
                    warn!("CSV log append failed: {}", e);
                }
            }
        }

        self.history.push(frame);
    }
}
