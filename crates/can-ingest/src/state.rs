//! Derived Vehicle State
//!
//! Two independent pieces of state, both updated only as observation
//! side effects of ingestion: the LED state byte and the airbag
//! life-counter watchdog. The LED atomic is also flipped optimistically
//! by the command path and reconciled by the next status frame.

use crate::config::BusIds;
use can_transport::RawFrame;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

struct AirbagWatchdog {
    life_counter: Option<u8>,
    last_change: Instant,
}

/// Process-wide derived state, shared behind an `Arc`
pub struct VehicleState {
    led: AtomicU8,
    airbag: Mutex<AirbagWatchdog>,
}

impl VehicleState {
    /// Create state with LED off and no life counter seen yet
    pub fn new() -> Self {
        Self {
            led: AtomicU8::new(0),
            airbag: Mutex::new(AirbagWatchdog {
                life_counter: None,
                last_change: Instant::now(),
            }),
        }
    }

    /// Update state from an observed frame
    ///
    /// Called from the single ingestion task only.
    pub fn observe(&self, frame: &RawFrame, ids: &BusIds) {
        if frame.id == ids.led_status && !frame.data.is_empty() {
            self.led.store(frame.data[0], Ordering::Relaxed);
            debug!(state = frame.data[0], "LED status observed");
        }

        if frame.id == ids.airbag && frame.data.len() >= 2 {
            let counter = frame.data[1];
            let mut watchdog = self.airbag.lock().unwrap_or_else(PoisonError::into_inner);
            if watchdog.life_counter != Some(counter) {
                watchdog.life_counter = Some(counter);
                watchdog.last_change = Instant::now();
                debug!(counter, "airbag life counter advanced");
            }
        }
    }

    /// Last known LED state byte
    pub fn led(&self) -> u8 {
        self.led.load(Ordering::Relaxed)
    }

    /// Set the LED state (optimistic flip from the command path)
    pub fn set_led(&self, state: u8) {
        self.led.store(state, Ordering::Relaxed);
    }

    /// Last observed airbag life counter, if any
    pub fn airbag_life_counter(&self) -> Option<u8> {
        self.airbag
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .life_counter
    }

    /// When the life counter last changed
    pub fn airbag_last_change(&self) -> Instant {
        self.airbag
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_change
    }

    /// Time since the life counter last changed, once one was seen
    ///
    /// A consumer may read "no change for T seconds" as "sensor
    /// silent"; nothing here acts on it.
    pub fn airbag_staleness(&self) -> Option<Duration> {
        let watchdog = self.airbag.lock().unwrap_or_else(PoisonError::into_inner);
        watchdog.life_counter.map(|_| watchdog.last_change.elapsed())
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new()
    }
}
