//! Modbus read-holding frames as GoodWe speaks them: RTU framing tunneled
//! over UDP datagrams (with an `AA 55` prefix on responses), and standard
//! MBAP framing over TCP.

use num_enum::TryFromPrimitive;

use crate::checksum::crc16;
use crate::error::{Error, Result};

pub const FUNCTION_READ: u8 = 0x03;

/// Responses shorter than this can't carry even an error PDU.
pub const MIN_RTU_RESPONSE_LEN: usize = 7;
pub const MIN_TCP_RESPONSE_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ExceptionCode {
    IllegalFunction = 1,
    IllegalDataAddress = 2,
    IllegalDataValue = 3,
    ServerDeviceFailure = 4,
    Acknowledge = 5,
    ServerDeviceBusy = 6,
    MemoryParityError = 8,
    GatewayPathUnavailable = 10,
    GatewayTargetFailed = 11,
}

fn exception_reason(code: u8) -> String {
    match ExceptionCode::try_from(code) {
        Ok(e) => format!("Modbus error response: {e:?} ({code})"),
        Err(_) => format!("Modbus error response: unknown exception {code}"),
    }
}

/// Monotonic MBAP transaction id, 1..=65535 wrapping back to 1. One sequence
/// per handler so concurrent handlers never share id space.
#[derive(Debug, Default)]
pub struct TransactionSeq {
    last: u16,
}

impl TransactionSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u16 {
        self.last = if self.last == u16::MAX { 1 } else { self.last + 1 };
        self.last
    }

    pub fn reset(&mut self) {
        self.last = 0;
    }
}

/// 8-byte RTU read request: addr, 0x03, start(BE), count(BE), CRC(LE).
pub fn build_rtu_read(comm_addr: u8, register_start: u16, register_count: u16) -> Vec<u8> {
    let mut frame = Vec::with_capacity(8);
    frame.push(comm_addr);
    frame.push(FUNCTION_READ);
    frame.extend_from_slice(&register_start.to_be_bytes());
    frame.extend_from_slice(&register_count.to_be_bytes());
    frame.extend_from_slice(&crc16(&frame).to_le_bytes());
    frame
}

/// 12-byte MBAP read request: txn(BE), protocol 0, length 6, unit, 0x03,
/// start(BE), count(BE).
pub fn build_tcp_read(
    transaction_id: u16,
    comm_addr: u8,
    register_start: u16,
    register_count: u16,
) -> Vec<u8> {
    let mut frame = Vec::with_capacity(12);
    frame.extend_from_slice(&transaction_id.to_be_bytes());
    frame.extend_from_slice(&0u16.to_be_bytes());
    frame.extend_from_slice(&6u16.to_be_bytes());
    frame.push(comm_addr);
    frame.push(FUNCTION_READ);
    frame.extend_from_slice(&register_start.to_be_bytes());
    frame.extend_from_slice(&register_count.to_be_bytes());
    frame
}

/// Validates a GoodWe RTU response: `AA 55` prefix, function/error code at
/// byte 3, byte count at byte 4, CRC over everything between prefix and
/// trailer.
pub fn validate_rtu(frame: &[u8], expected_function: u8, expected_register_count: u16) -> Result<()> {
    if frame.len() < MIN_RTU_RESPONSE_LEN {
        return Err(Error::validation(format!(
            "RTU response too short: {} bytes",
            frame.len()
        )));
    }

    if frame[0..2] != [0xAA, 0x55] {
        return Err(Error::validation(format!(
            "invalid RTU response header: {:02X} {:02X}",
            frame[0], frame[1]
        )));
    }

    if frame[3] == expected_function | 0x80 {
        return Err(Error::validation(exception_reason(frame[4])));
    }
    if frame[3] != expected_function {
        return Err(Error::validation(format!(
            "unexpected function code: got {:#04X}, expected {expected_function:#04X}",
            frame[3]
        )));
    }

    let byte_count = usize::from(frame[4]);
    let expected_bytes = usize::from(expected_register_count) * 2;
    if byte_count != expected_bytes {
        return Err(Error::validation(format!(
            "byte count mismatch: got {byte_count}, expected {expected_bytes}"
        )));
    }

    if frame.len() != 5 + byte_count + 2 {
        return Err(Error::validation(format!(
            "RTU frame length mismatch: got {}, expected {}",
            frame.len(),
            5 + byte_count + 2
        )));
    }

    let body = &frame[2..frame.len() - 2];
    let received = u16::from_le_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
    let computed = crc16(body);
    if computed != received {
        return Err(Error::validation(format!(
            "CRC mismatch: got {received:#06X}, computed {computed:#06X}"
        )));
    }

    Ok(())
}

/// Strips the 5-byte header and 2-byte CRC from a validated RTU frame.
pub fn extract_rtu(frame: &[u8]) -> Result<Vec<u8>> {
    if frame.len() < MIN_RTU_RESPONSE_LEN {
        return Err(Error::validation(format!(
            "RTU response too short: {} bytes",
            frame.len()
        )));
    }

    Ok(frame[5..frame.len() - 2].to_vec())
}

/// Validates an MBAP response. TCP framing has no CRC; length and function
/// checks only.
pub fn validate_tcp(frame: &[u8], expected_function: u8, expected_register_count: u16) -> Result<()> {
    if frame.len() < MIN_TCP_RESPONSE_LEN {
        return Err(Error::validation(format!(
            "TCP response too short: {} bytes",
            frame.len()
        )));
    }

    if frame[7] == expected_function | 0x80 {
        return Err(Error::validation(exception_reason(frame[8])));
    }
    if frame[7] != expected_function {
        return Err(Error::validation(format!(
            "unexpected function code: got {:#04X}, expected {expected_function:#04X}",
            frame[7]
        )));
    }

    let byte_count = usize::from(frame[8]);
    let expected_bytes = usize::from(expected_register_count) * 2;
    if byte_count != expected_bytes {
        return Err(Error::validation(format!(
            "byte count mismatch: got {byte_count}, expected {expected_bytes}"
        )));
    }

    if frame.len() != 9 + byte_count {
        return Err(Error::validation(format!(
            "TCP frame length mismatch: got {}, expected {}",
            frame.len(),
            9 + byte_count
        )));
    }

    Ok(())
}

/// Strips the 9-byte MBAP header, using the declared byte count.
pub fn extract_tcp(frame: &[u8]) -> Result<Vec<u8>> {
    if frame.len() < MIN_TCP_RESPONSE_LEN {
        return Err(Error::validation(format!(
            "TCP response too short: {} bytes",
            frame.len()
        )));
    }

    let byte_count = usize::from(frame[8]);
    if frame.len() < 9 + byte_count {
        return Err(Error::validation(format!(
            "TCP payload truncated: declared {byte_count}, got {}",
            frame.len() - 9
        )));
    }

    Ok(frame[9..9 + byte_count].to_vec())
}
