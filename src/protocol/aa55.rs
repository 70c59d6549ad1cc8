//! GoodWe's legacy AA55 framing: `AA 55 C0 7F` + command payload + 16-bit
//! byte-sum checksum, big-endian. Used for runtime reads on storage-class
//! inverters and for device info and discovery on every family.

use serde::Serialize;

use crate::checksum::aa55_checksum;
use crate::error::{Error, Result};

pub const HEADER: [u8; 2] = [0xAA, 0x55];
pub const REQUEST_PREFIX: [u8; 4] = [0xAA, 0x55, 0xC0, 0x7F];

/// Shortest well-formed response: header(2) + addresses(2) + type(2) +
/// length(1) + checksum(2).
pub const MIN_RESPONSE_LEN: usize = 9;

pub const READ_RUNTIME_COMMAND: &str = "010600";
pub const READ_RUNTIME_RESPONSE: [u8; 2] = [0x01, 0x86];
pub const DEVICE_INFO_COMMAND: &str = "010100";
pub const DEVICE_INFO_RESPONSE: [u8; 2] = [0x01, 0x81];
pub const DISCOVERY_COMMAND: &str = "010200";
pub const DISCOVERY_RESPONSE: [u8; 2] = [0x01, 0x82];

/// Builds a request frame around raw command-payload bytes.
pub fn build_request(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(REQUEST_PREFIX.len() + payload.len() + 2);
    frame.extend_from_slice(&REQUEST_PREFIX);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&aa55_checksum(&frame).to_be_bytes());
    frame
}

/// Builds a request from a hex command string, e.g. `"010600"`.
pub fn build_request_hex(command: &str) -> Result<Vec<u8>> {
    Ok(build_request(&parse_hex(command)?))
}

fn parse_hex(command: &str) -> Result<Vec<u8>> {
    if command.len() % 2 != 0 {
        return Err(Error::validation(format!(
            "odd-length hex command: {command}"
        )));
    }

    (0..command.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&command[i..i + 2], 16)
                .map_err(|_| Error::validation(format!("invalid hex command: {command}")))
        })
        .collect()
}

/// Checks header, optional response type (bytes 4-5) and byte-sum checksum.
pub fn validate(frame: &[u8], response_type: Option<[u8; 2]>) -> Result<()> {
    if frame.len() < MIN_RESPONSE_LEN {
        return Err(Error::validation(format!(
            "AA55 response too short: {} bytes",
            frame.len()
        )));
    }

    if frame[0..2] != HEADER {
        return Err(Error::validation(format!(
            "invalid AA55 header: {:02X} {:02X}",
            frame[0], frame[1]
        )));
    }

    if let Some(expected) = response_type {
        if frame[4..6] != expected {
            return Err(Error::validation(format!(
                "unexpected AA55 response type: got {:02X}{:02X}, expected {:02X}{:02X}",
                frame[4], frame[5], expected[0], expected[1]
            )));
        }
    }

    let body = &frame[..frame.len() - 2];
    let received = u16::from_be_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
    let computed = aa55_checksum(body);
    if computed != received {
        return Err(Error::validation(format!(
            "AA55 checksum mismatch: got {received:#06X}, computed {computed:#06X}"
        )));
    }

    Ok(())
}

/// Strips the 7-byte header and 2-byte checksum from a validated frame.
pub fn extract(frame: &[u8]) -> Result<Vec<u8>> {
    if frame.len() < MIN_RESPONSE_LEN {
        return Err(Error::validation(format!(
            "AA55 response too short: {} bytes",
            frame.len()
        )));
    }

    Ok(frame[7..frame.len() - 2].to_vec())
}

/// Fixed ASCII/numeric fields of the `0181` device-info payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub model_name: String,
    pub serial_number: String,
    pub firmware: String,
    pub arm_firmware: String,
    pub dsp1_version: String,
    pub dsp2_version: String,
    pub rated_power: u16,
    pub ac_output_type: u8,
}

const DEVICE_INFO_LEN: usize = 53;

impl DeviceInfo {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() < DEVICE_INFO_LEN {
            return Err(Error::validation(format!(
                "device info payload too short: {} bytes",
                payload.len()
            )));
        }

        Ok(Self {
            model_name: text_field(&payload[0..10]),
            serial_number: text_field(&payload[10..26]),
            firmware: text_field(&payload[26..32]),
            arm_firmware: text_field(&payload[32..38]),
            dsp1_version: text_field(&payload[38..44]),
            dsp2_version: text_field(&payload[44..50]),
            rated_power: u16::from_be_bytes([payload[50], payload[51]]),
            ac_output_type: payload[52],
        })
    }

    /// Best-effort variant for discovery responses: whatever fields fit the
    /// payload are filled in, the rest keep their defaults.
    pub fn decode_lossy(payload: &[u8]) -> Self {
        let mut info = Self::default();

        let take = |range: std::ops::Range<usize>| -> String {
            if payload.len() >= range.end {
                text_field(&payload[range])
            } else {
                String::new()
            }
        };

        info.model_name = take(0..10);
        info.serial_number = take(10..26);
        info.firmware = take(26..32);
        if payload.len() >= 52 {
            info.rated_power = u16::from_be_bytes([payload[50], payload[51]]);
        }
        info
    }

    /// Family code embedded in the model name, e.g. `GW5048D-ES` -> `ES`.
    /// Returns an empty string when the model doesn't carry one.
    pub fn family(&self) -> String {
        self.model_name
            .rsplit('-')
            .next()
            .map(|tail| tail.chars().filter(|c| c.is_ascii_alphabetic()).collect())
            .unwrap_or_default()
    }
}

/// ASCII field with embedded/padding NULs trimmed out.
fn text_field(data: &[u8]) -> String {
    String::from_utf8_lossy(data)
        .chars()
        .filter(|c| *c != '\0')
        .collect::<String>()
        .trim()
        .to_string()
}
