mod common;
use common::*;

use goodwe_bridge::checksum::{aa55_checksum, crc16};
use goodwe_bridge::family;
use goodwe_bridge::protocol::aa55;
use goodwe_bridge::protocol::modbus::{build_rtu_read, build_tcp_read, TransactionSeq};
use goodwe_bridge::protocol::{Codec, FrameCodec};
use goodwe_bridge::transport::TransportKind;

#[test]
fn aa55_read_request_bytes() {
    common_setup();

    let frame = aa55::build_request_hex("010600").unwrap();

    assert_eq!(frame.len(), 9);
    assert_eq!(&frame[..7], &[0xAA, 0x55, 0xC0, 0x7F, 0x01, 0x06, 0x00]);

    // trailing two bytes are the big-endian byte sum of everything before
    let expected = aa55_checksum(&frame[..7]);
    assert_eq!(
        u16::from_be_bytes([frame[7], frame[8]]),
        expected
    );
    assert_eq!(&frame[7..], &[0x02, 0x45]);
}

#[test]
fn aa55_rejects_bad_hex_command() {
    assert!(aa55::build_request_hex("01060").is_err());
    assert!(aa55::build_request_hex("zz").is_err());
}

#[test]
fn rtu_request_layout_and_crc() {
    let frame = build_rtu_read(0xF7, 35100, 125);

    assert_eq!(frame.len(), 8);
    assert_eq!(&frame[..6], &[0xF7, 0x03, 0x89, 0x1C, 0x00, 0x7D]);
    assert_eq!(&frame[6..8], crc16(&frame[..6]).to_le_bytes());
}

#[test]
fn tcp_request_layout() {
    let frame = build_tcp_read(1, 0x7F, 30100, 45);

    assert_eq!(
        frame,
        vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x7F, 0x03, 0x75, 0x94, 0x00, 0x2D]
    );
}

#[test]
fn transaction_ids_increment_and_wrap() {
    let mut seq = TransactionSeq::new();
    assert_eq!(seq.next(), 1);
    assert_eq!(seq.next(), 2);
    assert_eq!(seq.next(), 3);

    // spin up to the wrap point
    for _ in 0..65531 {
        seq.next();
    }
    assert_eq!(seq.next(), 65535);
    assert_eq!(seq.next(), 1);
}

#[test]
fn transaction_ids_reset() {
    let mut seq = TransactionSeq::new();
    seq.next();
    seq.next();
    seq.reset();
    assert_eq!(seq.next(), 1);
}

#[test]
fn default_comm_addresses() {
    assert_eq!(family::default_comm_addr("ET"), 0xF7);
    assert_eq!(family::default_comm_addr("eh"), 0xF7);
    assert_eq!(family::default_comm_addr("ES"), 0xF7);
    assert_eq!(family::default_comm_addr("BP"), 0xF7);
    assert_eq!(family::default_comm_addr("DT"), 0x7F);
    assert_eq!(family::default_comm_addr("ms"), 0x7F);
    assert_eq!(family::default_comm_addr("D-NS"), 0x7F);

    // unknown codes fall back rather than fail
    assert_eq!(family::default_comm_addr("ZZ"), 0xF7);
}

#[test]
fn unknown_family_is_rejected_by_registry() {
    assert!(family::resolve("ZZ").is_err());
    assert!(family::resolve("et").is_ok());
}

#[test]
fn codec_selection_follows_family_and_transport() {
    // storage families speak AA55 whatever the socket
    let mut codec = Codec::for_connection(family::es(), TransportKind::Udp, 0xF7).unwrap();
    let frame = codec.runtime_request().unwrap();
    assert_eq!(&frame[..4], &[0xAA, 0x55, 0xC0, 0x7F]);
    assert_eq!(codec.expected_len(), None);

    // hybrid over UDP -> RTU framing, 8-byte request
    let mut codec = Codec::for_connection(family::et(), TransportKind::Udp, 0xF7).unwrap();
    let frame = codec.runtime_request().unwrap();
    assert_eq!(frame.len(), 8);
    assert_eq!(codec.expected_len(), Some(5 + 250 + 2));

    // hybrid over TCP -> MBAP, 12-byte request with fresh transaction ids
    let mut codec = Codec::for_connection(family::et(), TransportKind::Tcp, 0xF7).unwrap();
    let first = codec.runtime_request().unwrap();
    let second = codec.runtime_request().unwrap();
    assert_eq!(first.len(), 12);
    assert_eq!(u16::from_be_bytes([first[0], first[1]]), 1);
    assert_eq!(u16::from_be_bytes([second[0], second[1]]), 2);
    assert_eq!(codec.expected_len(), Some(9 + 250));
}
