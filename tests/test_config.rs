mod common;
use common::*;

use std::io::Write;
use std::time::Duration;

use goodwe_bridge::config::Config;
use goodwe_bridge::transport::TransportKind;

fn load(yaml: &str) -> anyhow::Result<Config> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    Config::new(file.path().to_string_lossy().to_string())
}

#[test]
fn minimal_inverter_gets_defaults() {
    common_setup();

    let config = load(
        r#"
inverters:
  - host: 192.168.1.14
    family: ET
"#,
    )
    .unwrap();

    let inverter = &config.inverters[0];
    assert!(inverter.enabled());
    assert_eq!(inverter.port(), 8899);
    assert_eq!(inverter.transport(), TransportKind::Udp);
    assert_eq!(inverter.timeout(), Duration::from_millis(1000));
    assert_eq!(inverter.retries(), 3);
    assert_eq!(inverter.comm_addr(), 0xF7);
    assert_eq!(inverter.poll_interval(), Duration::from_secs(30));

    assert_eq!(config.loglevel(), "info");
    assert_eq!(config.discovery.broadcast_address, "255.255.255.255");
    assert_eq!(config.discovery.timeout, Duration::from_millis(2000));
}

#[test]
fn explicit_settings_override_defaults() {
    let config = load(
        r#"
loglevel: debug
inverters:
  - host: 192.168.1.15
    port: 502
    transport: tcp
    family: DT
    timeout_ms: 2500
    retries: 5
    comm_addr: 0x11
    poll_interval_secs: 10
discovery:
  broadcast_address: 192.168.1.255
  timeout_ms: 500
"#,
    )
    .unwrap();

    let inverter = &config.inverters[0];
    assert_eq!(inverter.port(), 502);
    assert_eq!(inverter.transport(), TransportKind::Tcp);
    assert_eq!(inverter.timeout(), Duration::from_millis(2500));
    assert_eq!(inverter.retries(), 5);
    assert_eq!(inverter.comm_addr(), 0x11);
    assert_eq!(inverter.poll_interval(), Duration::from_secs(10));

    assert_eq!(config.loglevel(), "debug");
    assert_eq!(config.discovery.broadcast_address, "192.168.1.255");
    assert_eq!(config.discovery.timeout, Duration::from_millis(500));
}

#[test]
fn comm_addr_auto_resolves_from_family() {
    let config = load(
        r#"
inverters:
  - host: a
    family: DT
    comm_addr: auto
  - host: b
    family: ES
    comm_addr: auto
"#,
    )
    .unwrap();

    assert_eq!(config.inverters[0].comm_addr(), 0x7F);
    assert_eq!(config.inverters[1].comm_addr(), 0xF7);
}

#[test]
fn unknown_family_is_rejected() {
    let err = load(
        r#"
inverters:
  - host: 192.168.1.14
    family: ZZ
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unsupported inverter family"), "{err}");
}

#[test]
fn disabled_inverters_are_filtered() {
    let config = load(
        r#"
inverters:
  - host: a
    family: ET
    enabled: false
  - host: b
    family: ES
"#,
    )
    .unwrap();

    let enabled: Vec<_> = config.enabled_inverters().map(|i| i.host()).collect();
    assert_eq!(enabled, vec!["b"]);
}

#[test]
fn missing_file_is_an_error() {
    let err = Config::new("/nonexistent/config.yaml".to_string()).unwrap_err();
    assert!(err.to_string().contains("error reading"), "{err}");
}
