//! CAN Bus Handle
//!
//! One handle serves both sides of the pipeline: the ingestion task
//! owns the receive path, the command path shares the send path. Sends
//! are serialized internally since SocketCAN sockets are not safe for
//! concurrent writes.

use crate::error::TransportError;
use crate::frame::{now_timestamp, RawFrame};
use socketcan::{tokio::CanSocket, CanFrame, EmbeddedFrame, ExtendedId, Id as CanId, StandardId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

enum BusInner {
    Socket(CanSocket),
    Mock(MockBus),
}

struct MockBus {
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<RawFrame>>,
    sent: Arc<Mutex<Vec<RawFrame>>>,
    fail_sends: Arc<AtomicBool>,
}

/// CAN bus transport handle
pub struct CanBus {
    interface: String,
    inner: BusInner,
    send_lock: tokio::sync::Mutex<()>,
}

impl CanBus {
    /// Open a SocketCAN interface (e.g. "can0")
    ///
    /// Failure here is fatal: the process must not start serving
    /// without a transport.
    pub fn open(interface: &str) -> Result<Self, TransportError> {
        let socket = CanSocket::open(interface).map_err(|source| TransportError::Init {
            interface: interface.to_string(),
            source,
        })?;
        info!("CAN interface {} opened", interface);

        Ok(Self {
            interface: interface.to_string(),
            inner: BusInner::Socket(socket),
            send_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Create a mock bus for testing (no hardware required)
    ///
    /// The returned handle injects inbound frames and records outbound
    /// ones. Dropping the handle closes the receive side.
    pub fn mock() -> (Self, MockBusHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let fail_sends = Arc::new(AtomicBool::new(false));

        let bus = Self {
            interface: "mock".to_string(),
            inner: BusInner::Mock(MockBus {
                rx: tokio::sync::Mutex::new(rx),
                sent: Arc::clone(&sent),
                fail_sends: Arc::clone(&fail_sends),
            }),
            send_lock: tokio::sync::Mutex::new(()),
        };

        (bus, MockBusHandle { tx, sent, fail_sends })
    }

    /// Interface name this bus was opened on
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Receive one frame, waiting at most `timeout`
    ///
    /// `Ok(None)` means the timeout elapsed with no frame, which is not
    /// an error. Remote and error frames are skipped the same way.
    pub async fn recv(&self, timeout: Duration) -> Result<Option<RawFrame>, TransportError> {
        match &self.inner {
            BusInner::Socket(socket) => {
                match tokio::time::timeout(timeout, socket.read_frame()).await {
                    Err(_) => Ok(None),
                    Ok(Err(e)) => Err(TransportError::Recv(e)),
                    Ok(Ok(CanFrame::Data(frame))) => {
                        let id = match frame.id() {
                            CanId::Standard(id) => id.as_raw() as u32,
                            CanId::Extended(id) => id.as_raw(),
                        };
                        Ok(Some(RawFrame::with_timestamp(
                            id,
                            frame.data(),
                            now_timestamp(),
                        )))
                    }
                    Ok(Ok(other)) => {
                        debug!("ignoring non-data frame: {:?}", other);
                        Ok(None)
                    }
                }
            }
            BusInner::Mock(mock) => {
                let mut rx = mock.rx.lock().await;
                match tokio::time::timeout(timeout, rx.recv()).await {
                    Err(_) => Ok(None),
                    Ok(Some(frame)) => Ok(Some(frame)),
                    Ok(None) => Err(TransportError::Closed),
                }
            }
        }
    }

    /// Send one frame, serialized against concurrent sends
    pub async fn send(&self, frame: &RawFrame) -> Result<(), TransportError> {
        let _guard = self.send_lock.lock().await;

        match &self.inner {
            BusInner::Socket(socket) => {
                let out = to_socket_frame(frame)?;
                socket
                    .write_frame(out)
                    .await
                    .map_err(|e| TransportError::SendFailed(e.to_string()))?;
                debug!("sent frame {} [{}]", frame.id_hex(), frame.data_hex());
                Ok(())
            }
            BusInner::Mock(mock) => {
                if mock.fail_sends.load(Ordering::Relaxed) {
                    return Err(TransportError::SendFailed("mock send failure".to_string()));
                }
                let mut sent = mock
                    .sent
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                sent.push(frame.clone());
                Ok(())
            }
        }
    }
}

fn to_socket_frame(frame: &RawFrame) -> Result<CanFrame, TransportError> {
    let id: CanId = if frame.id <= StandardId::MAX.as_raw() as u32 {
        StandardId::new(frame.id as u16)
            .ok_or(TransportError::InvalidId(frame.id))?
            .into()
    } else {
        ExtendedId::new(frame.id)
            .ok_or(TransportError::InvalidId(frame.id))?
            .into()
    };

    CanFrame::new(id, &frame.data)
        .ok_or_else(|| TransportError::SendFailed("payload exceeds 8 bytes".to_string()))
}

/// Test-side handle for a mock bus
pub struct MockBusHandle {
    tx: mpsc::UnboundedSender<RawFrame>,
    sent: Arc<Mutex<Vec<RawFrame>>>,
    fail_sends: Arc<AtomicBool>,
}

impl MockBusHandle {
    /// Queue a frame for the next `recv` call
    pub fn inject(&self, frame: RawFrame) {
        let _ = self.tx.send(frame);
    }

    /// Frames sent through the bus so far
    pub fn sent_frames(&self) -> Vec<RawFrame> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Make subsequent sends fail with a transport error
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_recv_returns_injected_frames() {
        let (bus, handle) = CanBus::mock();
        handle.inject(RawFrame::with_timestamp(0x171, &[0x01], 1.0));

        let frame = bus.recv(Duration::from_millis(50)).await.unwrap().unwrap();
        assert_eq!(frame.id, 0x171);
        assert_eq!(frame.data, vec![0x01]);
    }

    #[tokio::test]
    async fn test_mock_recv_timeout_is_not_an_error() {
        let (bus, _handle) = CanBus::mock();
        let result = bus.recv(Duration::from_millis(10)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_mock_recv_closed_after_handle_drop() {
        let (bus, handle) = CanBus::mock();
        drop(handle);

        let err = bus.recv(Duration::from_millis(10)).await.unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }

    #[tokio::test]
    async fn test_mock_send_records_frames() {
        let (bus, handle) = CanBus::mock();
        bus.send(&RawFrame::with_timestamp(0x170, &[0x01], 1.0))
            .await
            .unwrap();

        let sent = handle.sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, 0x170);
        assert_eq!(sent[0].data, vec![0x01]);
    }

    #[tokio::test]
    async fn test_mock_send_failure() {
        let (bus, handle) = CanBus::mock();
        handle.fail_sends(true);

        let err = bus
            .send(&RawFrame::with_timestamp(0x170, &[0x01], 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::SendFailed(_)));
        assert!(handle.sent_frames().is_empty());
    }

    #[test]
    fn test_standard_and_extended_id_mapping() {
        let std_frame = to_socket_frame(&RawFrame::with_timestamp(0x7FF, &[0x00], 1.0)).unwrap();
        assert!(matches!(std_frame.id(), CanId::Standard(_)));

        let ext_frame = to_socket_frame(&RawFrame::with_timestamp(0x800, &[0x00], 1.0)).unwrap();
        assert!(matches!(ext_frame.id(), CanId::Extended(_)));
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let frame = RawFrame::with_timestamp(0x100, &[0u8; 9], 1.0);
        assert!(matches!(
            to_socket_frame(&frame),
            Err(TransportError::SendFailed(_))
        ));
    }
}
