mod common;
use common::*;

use std::time::Duration;

use tokio::net::UdpSocket;

use goodwe_bridge::discovery;
use goodwe_bridge::protocol::aa55;

#[tokio::test]
async fn empty_window_resolves_with_no_inverters() {
    common_setup();

    // nothing listens on this loopback alias, so the window just elapses
    let found = discovery::discover(Duration::from_millis(500), "127.0.0.2")
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn collects_and_decodes_responders() {
    let responder = UdpSocket::bind(("127.0.0.1", discovery::DISCOVERY_PORT))
        .await
        .unwrap();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        let (len, addr) = responder.recv_from(&mut buf).await.unwrap();
        // probe is the discovery command, not the runtime one
        assert_eq!(&buf[..len][4..7], &[0x01, 0x02, 0x00]);

        let payload = Factory::device_info_payload("GW5048D-ES", "95048ESU12345678", 5048);
        let frame = Factory::aa55_response(aa55::DISCOVERY_RESPONSE, &payload);
        responder.send_to(&frame, addr).await.unwrap();

        // second answer from the same IP must be ignored
        responder.send_to(&frame, addr).await.unwrap();
    });

    let found = discovery::discover(Duration::from_millis(500), "127.0.0.1")
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ip, "127.0.0.1");
    assert_eq!(found[0].family, "ES");
    assert_eq!(found[0].serial_number, "95048ESU12345678");
    assert_eq!(found[0].model_name, "GW5048D-ES");
}
