//! Bounded FIFO Buffer Implementation

use can_transport::RawFrame;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Default buffer capacity (matches the dashboard's rolling window)
pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity, thread-safe ordered store of recent frames
///
/// The mutex is scoped to push/snapshot only; readers decode and
/// serialize from the snapshot copy without holding any lock.
pub struct HistoryBuffer {
    frames: Mutex<VecDeque<RawFrame>>,
    capacity: usize,
    total_pushed: AtomicU64,
}

impl HistoryBuffer {
    /// Create a buffer holding at most `capacity` frames
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            total_pushed: AtomicU64::new(0),
        }
    }

    /// Create a buffer with the default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Append a frame, evicting the oldest once at capacity
    pub fn push(&self, frame: RawFrame) {
        // A poisoned lock still guards a valid queue
        let mut frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        while frames.len() >= self.capacity {
            frames.pop_front();
        }
        frames.push_back(frame);
        self.total_pushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the buffer contents, oldest first
    pub fn snapshot(&self) -> Vec<RawFrame> {
        let frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        frames.iter().cloned().collect()
    }

    /// Number of frames currently held
    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of frames held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total frames pushed since construction (for statistics)
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed.load(Ordering::Relaxed)
    }
}
