//! Decode Rules
//!
//! Dispatch is by exact id match against the fixed table below. Every
//! rule that cannot apply (short payload, unmatched bytes) makes the
//! frame fall back to a single raw-hex record instead of erroring.

use crate::ids;
use crate::record::DecodedRecord;
use can_transport::RawFrame;

/// Human label for a known id, if any
pub fn label_for(id: u32) -> Option<&'static str> {
    match id {
        ids::AIRBAG_SRS => Some("Airbag SRS"),
        ids::HIGH_BEAM => Some("High Beam"),
        ids::BATTERY_WARNING => Some("Battery Warning"),
        ids::CRASH_TRIGGER => Some("Crash Trigger"),
        ids::TEMPERATURE => Some("Temperature Sensor"),
        ids::CABIN_TEMPERATURE => Some("Cabin Temperature"),
        ids::BLINKER => Some("Blinker"),
        ids::BUTTON_B1 => Some("Button B1"),
        ids::LED_CONTROL => Some("LED Control"),
        ids::LED_STATUS => Some("LED Status"),
        ids::STM32_TEST => Some("STM32 Test"),
        ids::BLINKER_ACK => Some("Blinker Ack"),
        ids::HOOD_WIPER => Some("Hood & Wiper Feedback"),
        ids::STALK => Some("Right Stalk / Wiper / Lights"),
        _ => None,
    }
}

/// Decode a raw frame into one or more records
pub fn decode_frame(frame: &RawFrame) -> Vec<DecodedRecord> {
    decode(frame.id, &frame.data, frame.timestamp)
}

/// Decode an id/payload pair into one or more records
///
/// Never fails and never returns an empty list: an unknown id or an
/// uninterpretable payload yields one record carrying the raw hex.
pub fn decode(id: u32, data: &[u8], timestamp: f64) -> Vec<DecodedRecord> {
    let facts: Vec<(&'static str, String)> = match id {
        ids::STALK => decode_stalk(data),
        ids::HOOD_WIPER => fact("Hood & Wiper Feedback", decode_hood_wiper(data)),
        ids::BLINKER_ACK => fact("Blinker Ack", decode_blinker_ack(data)),
        ids::TEMPERATURE => fact("Temperature Sensor", decode_temperature(data, 256.0, 1)),
        ids::CABIN_TEMPERATURE => fact("Cabin Temperature", decode_temperature(data, 100.0, 2)),
        ids::AIRBAG_SRS => fact("Airbag SRS", decode_airbag(data)),
        ids::HIGH_BEAM => fact("High Beam", decode_flag(data, "High Beam On", "High Beam Off")),
        ids::BATTERY_WARNING => {
            fact("Battery Warning", decode_flag(data, "Battery Low", "Battery OK"))
        }
        ids::CRASH_TRIGGER => {
            fact("Crash Trigger", decode_flag(data, "Crash Detected", "No Crash"))
        }
        ids::BUTTON_B1 => fact("Button B1", decode_flag(data, "Pressed", "Released")),
        ids::LED_CONTROL => fact("LED Control", decode_flag(data, "LED On", "LED Off")),
        ids::LED_STATUS => fact("LED Status", decode_flag(data, "LED On", "LED Off")),
        _ => Vec::new(),
    };

    if facts.is_empty() {
        let label = label_for(id).unwrap_or("Unknown");
        return vec![DecodedRecord::new(id, label, payload_hex(data), timestamp)];
    }

    facts
        .into_iter()
        .map(|(label, value)| DecodedRecord::new(id, label, value, timestamp))
        .collect()
}

fn fact(label: &'static str, value: Option<String>) -> Vec<(&'static str, String)> {
    value.map(|v| vec![(label, v)]).unwrap_or_default()
}

fn payload_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Combined stalk frame: several independent facts per frame
fn decode_stalk(data: &[u8]) -> Vec<(&'static str, String)> {
    let mut facts = Vec::new();

    if let Some(&b0) = data.first() {
        if b0 & 0x01 != 0 {
            facts.push(("Blinker", "Left".to_string()));
        }
        if b0 & 0x02 != 0 {
            facts.push(("Blinker", "Right".to_string()));
        }
        if b0 & 0x08 != 0 {
            facts.push(("High Beam", "On".to_string()));
        }
        if b0 & 0x04 != 0 {
            facts.push(("High Beam", "Flash".to_string()));
        }
    }

    if data.len() >= 2 {
        let mode = match (data[0], data[1]) {
            (0x02, 0x88) => Some("Wiper High"),
            (0x02, 0x85) => Some("Wiper Low"),
            (0x00, 0x82) => Some("Wiper Auto"),
            (0x00, 0x90) => Some("Washer Fluid"),
            _ => None,
        };
        if let Some(mode) = mode {
            facts.push(("Wiper", mode.to_string()));
        }
    }

    if let Some(&b2) = data.get(2) {
        let level = match b2 {
            0x01 => Some(1),
            0x05 => Some(2),
            0x09 => Some(3),
            0x0D => Some(4),
            _ => None,
        };
        if let Some(level) = level {
            facts.push(("Wiper Sensitivity", format!("Sensitivity {}/4", level)));
        }
    }

    facts
}

/// Hood and wiper feedback: exact 2-byte-prefix table
fn decode_hood_wiper(data: &[u8]) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let state = match (data[0], data[1]) {
        (0x88, 0x00) => "Hood Closed",
        (0x88, 0x04) => "Hood Open",
        (0x81, 0x20) => "Wiper Active",
        _ => return None,
    };
    Some(state.to_string())
}

/// Blinker acknowledge: byte1 exact-match table
fn decode_blinker_ack(data: &[u8]) -> Option<String> {
    let state = match *data.get(1)? {
        0x00 => "None",
        0x01 => "Left Ack",
        0x02 => "Right Ack",
        _ => return None,
    };
    Some(state.to_string())
}

/// Temperature: big-endian integer over the full payload, fixed scale
fn decode_temperature(data: &[u8], scale: f64, decimals: usize) -> Option<String> {
    if data.is_empty() || data.len() > 8 {
        return None;
    }
    let mut raw: u64 = 0;
    for &b in data {
        raw = (raw << 8) | b as u64;
    }
    let celsius = raw as f64 / scale;
    Some(match decimals {
        1 => format!("{:.1} °C", celsius),
        _ => format!("{:.2} °C", celsius),
    })
}

/// Airbag / SRS: byte0 status phrase, byte1 rolling life counter
fn decode_airbag(data: &[u8]) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let phrase = match data[0] {
        0x64 => "Airbag nominal",
        0x65 => "Side impact detected",
        0x66 => "Frontal impact detected",
        _ => "Unknown airbag status",
    };
    Some(format!("{}, life counter {:02X}", phrase, data[1]))
}

/// Binary state: byte0 zero/non-zero selects one of two fixed strings
fn decode_flag(data: &[u8], on: &str, off: &str) -> Option<String> {
    data.first()
        .map(|&b| if b != 0 { on } else { off }.to_string())
}
