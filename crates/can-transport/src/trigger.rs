//! Edge-Trigger Notification Boundary
//!
//! Notification-mode ingestion blocks on a falling-edge event instead
//! of polling the socket. The hardware side (a GPIO interrupt thread,
//! out of scope here) feeds the sender; the ingestion loop waits on
//! the receiver. The channel is bounded so a burst of edges while the
//! loop is busy simply coalesces, which matches interrupt semantics:
//! spurious and missed edges must both be tolerated.

use tokio::sync::mpsc;

/// Create a connected edge sender/trigger pair
pub fn edge_channel(capacity: usize) -> (EdgeSender, EdgeTrigger) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EdgeSender { tx }, EdgeTrigger { rx })
}

/// Producer half, driven by the interrupt source
#[derive(Clone)]
pub struct EdgeSender {
    tx: mpsc::Sender<()>,
}

impl EdgeSender {
    /// Signal one falling edge; dropped silently if the queue is full
    pub fn signal(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Consumer half, waited on by the ingestion loop
pub struct EdgeTrigger {
    rx: mpsc::Receiver<()>,
}

impl EdgeTrigger {
    /// Wait for the next edge; `None` once every sender is gone
    pub async fn wait(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_edge_delivery() {
        let (sender, mut trigger) = edge_channel(4);
        sender.signal();
        assert!(trigger.wait().await.is_some());
    }

    #[tokio::test]
    async fn test_edges_coalesce_when_full() {
        let (sender, mut trigger) = edge_channel(1);
        sender.signal();
        sender.signal();
        sender.signal();

        assert!(trigger.wait().await.is_some());
        drop(sender);
        // Only one edge survived the full queue
        assert!(trigger.wait().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_after_sender_drop() {
        let (sender, mut trigger) = edge_channel(4);
        drop(sender);
        assert!(trigger.wait().await.is_none());
    }
}
