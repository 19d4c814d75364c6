//! CAN Frame Decoder
//!
//! Maps a frame id plus payload into zero or more human-readable
//! `(label, value)` records. Decoding is a pure function over a fixed
//! id table and can never fail: anything a rule cannot interpret
//! degrades to the raw hex payload, so the query surface always gets
//! at least one record per frame.

mod decoder;
mod record;

pub use decoder::{decode, decode_frame, label_for};
pub use record::DecodedRecord;

/// Well-known arbitration ids on the dashboard bus
pub mod ids {
    /// Airbag / SRS status with rolling life counter
    pub const AIRBAG_SRS: u32 = 0x050;
    /// High beam flag
    pub const HIGH_BEAM: u32 = 0x110;
    /// Battery warning flag
    pub const BATTERY_WARNING: u32 = 0x120;
    /// Crash trigger flag
    pub const CRASH_TRIGGER: u32 = 0x130;
    /// Outside temperature sensor (scale 1/256)
    pub const TEMPERATURE: u32 = 0x140;
    /// Cabin temperature sensor (scale 1/100)
    pub const CABIN_TEMPERATURE: u32 = 0x141;
    /// Blinker status
    pub const BLINKER: u32 = 0x150;
    /// Board button B1
    pub const BUTTON_B1: u32 = 0x160;
    /// LED control command
    pub const LED_CONTROL: u32 = 0x170;
    /// LED status feedback
    pub const LED_STATUS: u32 = 0x171;
    /// Test frame from the STM32 node
    pub const STM32_TEST: u32 = 0x321;
    /// Blinker acknowledge
    pub const BLINKER_ACK: u32 = 0x451;
    /// Hood and wiper feedback
    pub const HOOD_WIPER: u32 = 0x459;
    /// Combined right stalk (blinker / wiper / lights)
    pub const STALK: u32 = 0x2C2;
}
