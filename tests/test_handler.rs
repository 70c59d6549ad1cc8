mod common;
use common::*;

use std::time::Duration;

use tokio::net::UdpSocket;

use goodwe_bridge::config::Inverter;
use goodwe_bridge::handler::{LinkState, ProtocolHandler};
use goodwe_bridge::protocol::aa55;
use goodwe_bridge::sensor::Value;
use goodwe_bridge::transport::TransportKind;

fn inverter(port: u16, family: &str) -> Inverter {
    Inverter {
        enabled: true,
        host: "127.0.0.1".to_string(),
        port,
        transport: TransportKind::Udp,
        family: family.to_string(),
        timeout: Some(Duration::from_millis(500)),
        retries: Some(1),
        comm_addr: None,
        poll_interval_secs: None,
    }
}

/// One-shot fake inverter: answers the first datagram with `response`.
async fn spawn_responder(response: Vec<u8>) -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        let (_, addr) = socket.recv_from(&mut buf).await.unwrap();
        socket.send_to(&response, addr).await.unwrap();
    });

    port
}

#[tokio::test]
async fn reads_runtime_data_from_storage_inverter() {
    common_setup();

    let mut payload = vec![0u8; 90];
    put_u16(&mut payload, 0, 2455); // vpv1
    put_u16(&mut payload, 29, 2310); // vgrid
    let response = Factory::aa55_response(aa55::READ_RUNTIME_RESPONSE, &payload);

    let port = spawn_responder(response).await;
    let mut handler = ProtocolHandler::new(&inverter(port, "ES")).unwrap();

    let values = handler.read_runtime_data().await.unwrap();
    assert_eq!(values.get("vpv1"), Some(&Value::Float(245.5)));
    assert_eq!(values.get("vgrid"), Some(&Value::Float(231.0)));
    assert_eq!(handler.state(), LinkState::Connected);
    assert_eq!(handler.consecutive_failures(), 0);
    assert_eq!(handler.last_error(), None);
}

#[tokio::test]
async fn reads_device_info_over_udp() {
    let payload = Factory::device_info_payload("GW5048D-ES", "95048ESU12345678", 5048);
    let response = Factory::aa55_response(aa55::DEVICE_INFO_RESPONSE, &payload);

    let port = spawn_responder(response).await;
    let mut handler = ProtocolHandler::new(&inverter(port, "ES")).unwrap();

    let info = handler.read_device_info().await.unwrap();
    assert_eq!(info.model_name, "GW5048D-ES");
    assert_eq!(info.family(), "ES");
}

#[tokio::test]
async fn timeout_is_wrapped_as_read_error() {
    // bound but silent, so the request times out
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let mut handler = ProtocolHandler::new(&inverter(port, "ES")).unwrap();

    let err = handler.read_runtime_data().await.unwrap_err();
    assert_eq!(err.code(), "READ_ERROR");
    assert!(err.to_string().contains("no response within"), "{err}");
    assert_eq!(handler.consecutive_failures(), 1);
    assert!(handler.last_error().is_some());

    drop(socket);
}

#[tokio::test]
async fn invalid_response_is_wrapped_as_read_error() {
    // wrong checksum on an otherwise plausible frame
    let mut response = Factory::aa55_response(aa55::READ_RUNTIME_RESPONSE, &[0u8; 90]);
    let last = response.len() - 1;
    response[last] ^= 0x01;

    let port = spawn_responder(response).await;
    let mut handler = ProtocolHandler::new(&inverter(port, "ES")).unwrap();

    let err = handler.read_runtime_data().await.unwrap_err();
    assert_eq!(err.code(), "READ_ERROR");
    assert!(err.to_string().contains("checksum mismatch"), "{err}");
}

#[tokio::test]
async fn success_resets_failure_counter() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let mut handler = ProtocolHandler::new(&inverter(port, "ES")).unwrap();
    handler.read_runtime_data().await.unwrap_err();
    assert_eq!(handler.consecutive_failures(), 1);

    // now start answering
    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        let (_, addr) = socket.recv_from(&mut buf).await.unwrap();
        let response = Factory::aa55_response(aa55::READ_RUNTIME_RESPONSE, &[0u8; 90]);
        socket.send_to(&response, addr).await.unwrap();
    });

    handler.read_runtime_data().await.unwrap();
    assert_eq!(handler.consecutive_failures(), 0);
}

#[tokio::test]
async fn disconnect_clears_session_state() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let mut handler = ProtocolHandler::new(&inverter(port, "ES")).unwrap();
    handler.read_runtime_data().await.unwrap_err();

    handler.disconnect().await;
    assert_eq!(handler.state(), LinkState::Disconnected);
    assert_eq!(handler.consecutive_failures(), 0);
    assert_eq!(handler.last_error(), None);

    drop(socket);
}

#[tokio::test]
async fn unknown_family_fails_at_construction() {
    let err = ProtocolHandler::new(&inverter(8899, "ZZ")).unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_FAMILY");
}
