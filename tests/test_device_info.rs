mod common;
use common::*;

use goodwe_bridge::protocol::aa55::{self, DeviceInfo};

#[test]
fn decodes_fixed_fields() {
    common_setup();

    let payload = Factory::device_info_payload("GW5048D-ES", "95048ESU12345678", 5048);
    let info = DeviceInfo::decode(&payload).unwrap();

    assert_eq!(info.model_name, "GW5048D-ES");
    assert_eq!(info.serial_number, "95048ESU12345678");
    assert_eq!(info.firmware, "1.40");
    assert_eq!(info.arm_firmware, "04029");
    assert_eq!(info.dsp1_version, "V1.10");
    assert_eq!(info.dsp2_version, "V1.20");
    assert_eq!(info.rated_power, 5048);
    assert_eq!(info.ac_output_type, 1);
}

#[test]
fn trims_embedded_nuls() {
    let mut payload = Factory::device_info_payload("GW10K-ET", "9010KETU00000000", 10000);
    // NUL in the middle of the model field, not just padding
    payload[4] = 0;
    let info = DeviceInfo::decode(&payload).unwrap();

    assert_eq!(info.model_name, "GW10-ET");
}

#[test]
fn short_payload_is_a_validation_error() {
    let err = DeviceInfo::decode(&[0u8; 20]).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[test]
fn lossy_decode_defaults_missing_fields() {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"GW5000-EH\0");
    payload.extend_from_slice(b"somejunk");

    let info = DeviceInfo::decode_lossy(&payload);
    assert_eq!(info.model_name, "GW5000-EH");
    assert_eq!(info.serial_number, "");
    assert_eq!(info.rated_power, 0);
}

#[test]
fn family_comes_from_model_suffix() {
    let payload = Factory::device_info_payload("GW5048D-ES", "95048ESU12345678", 5048);
    let info = DeviceInfo::decode(&payload).unwrap();
    assert_eq!(info.family(), "ES");

    let no_dash = DeviceInfo {
        model_name: "GW5000".to_string(),
        ..Default::default()
    };
    assert_eq!(no_dash.family(), "GW");

    assert_eq!(DeviceInfo::default().family(), "");
}

#[test]
fn device_info_exchange_round_trip() {
    let request = aa55::build_request_hex(aa55::DEVICE_INFO_COMMAND).unwrap();
    assert_eq!(&request[4..7], &[0x01, 0x01, 0x00]);

    let payload = Factory::device_info_payload("GW6000-DT", "96000DTU00000000", 6000);
    let frame = Factory::aa55_response(aa55::DEVICE_INFO_RESPONSE, &payload);

    aa55::validate(&frame, Some(aa55::DEVICE_INFO_RESPONSE)).unwrap();
    let extracted = aa55::extract(&frame).unwrap();
    let info = DeviceInfo::decode(&extracted).unwrap();
    assert_eq!(info.model_name, "GW6000-DT");
    assert_eq!(info.rated_power, 6000);
}
