#![allow(dead_code)]

use goodwe_bridge::checksum::{aa55_checksum, crc16};

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Factory;

impl Factory {
    /// GoodWe RTU response: AA 55 prefix, comm addr, function, byte count,
    /// payload, CRC-16 (LE) over everything after the prefix.
    pub fn rtu_response(comm_addr: u8, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xAA, 0x55, comm_addr, 0x03, payload.len() as u8];
        frame.extend_from_slice(payload);
        let crc = crc16(&frame[2..]);
        frame.extend_from_slice(&crc.to_le_bytes());
        frame
    }

    /// MBAP response: txn, protocol 0, length, unit, function, byte count,
    /// payload.
    pub fn tcp_response(transaction_id: u16, unit: u8, payload: &[u8]) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&transaction_id.to_be_bytes());
        frame.extend_from_slice(&0u16.to_be_bytes());
        frame.extend_from_slice(&((payload.len() as u16) + 3).to_be_bytes());
        frame.push(unit);
        frame.push(0x03);
        frame.push(payload.len() as u8);
        frame.extend_from_slice(payload);
        frame
    }

    /// AA55 response: header, addresses, response type, length byte,
    /// payload, byte-sum checksum (BE) over everything preceding it.
    pub fn aa55_response(response_type: [u8; 2], payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xAA, 0x55, 0x7F, 0xC0];
        frame.extend_from_slice(&response_type);
        frame.push(payload.len() as u8);
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&aa55_checksum(&frame).to_be_bytes());
        frame
    }

    /// 53-byte device-info payload with NUL-padded ASCII fields.
    pub fn device_info_payload(model: &str, serial: &str, rated_power: u16) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&padded(model, 10));
        payload.extend_from_slice(&padded(serial, 16));
        payload.extend_from_slice(&padded("1.40", 6));
        payload.extend_from_slice(&padded("04029", 6));
        payload.extend_from_slice(&padded("V1.10", 6));
        payload.extend_from_slice(&padded("V1.20", 6));
        payload.extend_from_slice(&rated_power.to_be_bytes());
        payload.push(1);
        payload
    }
}

fn padded(text: &str, len: usize) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(len, 0);
    bytes
}

/// Writes a big-endian u16 into `buf` at `offset`.
pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Writes a big-endian u32 into `buf` at `offset`.
pub fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}
