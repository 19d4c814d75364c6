//! LED Command Path

use crate::config::BusIds;
use crate::state::VehicleState;
use can_transport::{CanBus, RawFrame, TransportError};
use tracing::info;

/// Toggle the LED by sending its complemented state over the bus
///
/// On success the local LED state is flipped optimistically and the
/// new state returned; the next observed status frame reconciles it.
/// On send failure the state is left untouched and the error is
/// surfaced to the caller.
pub async fn toggle_led(
    bus: &CanBus,
    state: &VehicleState,
    ids: &BusIds,
) -> Result<u8, TransportError> {
    let new_state: u8 = if state.led() == 0 { 1 } else { 0 };
    let frame = RawFrame::new(ids.led_control, &[new_state]);

    bus.send(&frame).await?;
    state.set_led(new_state);
    info!(state = new_state, "LED toggle sent");
    Ok(new_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toggle_from_off_sends_one() {
        let (bus, handle) = CanBus::mock();
        let state = VehicleState::new();
        let ids = BusIds::default();

        let new_state = toggle_led(&bus, &state, &ids).await.unwrap();
        assert_eq!(new_state, 1);
        assert_eq!(state.led(), 1);

        let sent = handle.sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, 0x170);
        assert_eq!(sent[0].data, vec![1]);
    }

    #[tokio::test]
    async fn test_toggle_from_on_sends_zero() {
        let (bus, handle) = CanBus::mock();
        let state = VehicleState::new();
        state.set_led(1);

        let new_state = toggle_led(&bus, &state, &BusIds::default()).await.unwrap();
        assert_eq!(new_state, 0);
        assert_eq!(handle.sent_frames()[0].data, vec![0]);
    }

    #[tokio::test]
    async fn test_nonzero_state_complements_to_zero() {
        let (bus, handle) = CanBus::mock();
        let state = VehicleState::new();
        state.set_led(7);

        toggle_led(&bus, &state, &BusIds::default()).await.unwrap();
        assert_eq!(state.led(), 0);
        assert_eq!(handle.sent_frames()[0].data, vec![0]);
    }

    #[tokio::test]
    async fn test_send_failure_leaves_state_unchanged() {
        let (bus, handle) = CanBus::mock();
        handle.fail_sends(true);
        let state = VehicleState::new();

        let err = toggle_led(&bus, &state, &BusIds::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::SendFailed(_)));
        assert_eq!(state.led(), 0);
        assert!(handle.sent_frames().is_empty());
    }
}
