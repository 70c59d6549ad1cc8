use std::collections::HashSet;
use std::net::IpAddr;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;
use tokio::net::UdpSocket;
use tokio::time::Instant;

use crate::error::Result;
use crate::protocol::aa55::{self, DeviceInfo};

pub const DISCOVERY_PORT: u16 = 8899;

/// An inverter that answered the broadcast probe. Family/serial/model are
/// best-effort; malformed responses leave them empty rather than dropping
/// the entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredInverter {
    pub ip: String,
    pub port: u16,
    pub family: String,
    pub serial_number: String,
    pub model_name: String,
}

/// Broadcasts the AA55 discovery command and collects answers until the
/// window elapses, de-duplicated by source IP.
///
/// An elapsed window is success — the result is whatever was collected,
/// possibly nothing. Only socket bind/send failures are errors.
pub async fn discover(timeout: Duration, broadcast_address: &str) -> Result<Vec<DiscoveredInverter>> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.set_broadcast(true)?;

    let probe = aa55::build_request_hex(aa55::DISCOVERY_COMMAND)?;
    socket
        .send_to(&probe, (broadcast_address, DISCOVERY_PORT))
        .await?;
    debug!("discovery probe sent to {broadcast_address}:{DISCOVERY_PORT}");

    let deadline = Instant::now() + timeout;
    let mut found = Vec::new();
    let mut seen: HashSet<IpAddr> = HashSet::new();
    let mut buf = vec![0u8; 4096];

    loop {
        let remaining = match deadline.checked_duration_since(Instant::now()) {
            Some(remaining) => remaining,
            None => break,
        };

        let (len, addr) = match tokio::time::timeout(remaining, socket.recv_from(&mut buf)).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => {
                // receive hiccups don't abort the scan
                warn!("discovery receive error: {e}");
                continue;
            }
            Err(_) => break,
        };

        let frame = &buf[..len];
        if frame.len() < aa55::MIN_RESPONSE_LEN || frame[0..2] != aa55::HEADER {
            debug!("discovery: ignoring malformed response from {addr}");
            continue;
        }

        if !seen.insert(addr.ip()) {
            continue;
        }

        let payload = match aa55::extract(frame) {
            Ok(payload) => payload,
            Err(_) => continue,
        };

        let info = DeviceInfo::decode_lossy(&payload);
        debug!("discovery: {} answered ({})", addr, info.model_name);

        found.push(DiscoveredInverter {
            ip: addr.ip().to_string(),
            port: addr.port(),
            family: info.family(),
            serial_number: info.serial_number,
            model_name: info.model_name,
        });
    }

    Ok(found)
}
