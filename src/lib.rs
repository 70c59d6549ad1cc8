pub mod checksum;   // CRC-16/Modbus and AA55 byte-sum checksums
pub mod config;     // YAML configuration
pub mod discovery;  // UDP broadcast scan
pub mod error;      // Engine error taxonomy
pub mod events;     // Handler state-change event stream
pub mod family;     // Per-family sensor tables and comm addresses
pub mod handler;    // Per-inverter session state machine
pub mod options;    // Command line options parsing
pub mod prelude;    // Common imports and types
pub mod protocol;   // AA55 / Modbus-RTU / Modbus-TCP framing
pub mod retry;      // Bounded retry with exponential backoff
pub mod sensor;     // Sensor definitions and payload decoding
pub mod transport;  // UDP/TCP socket ownership

const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use std::io::Write;

use anyhow::Result;
use log::{debug, error, info, warn};
use tokio::sync::broadcast;

use crate::config::Config;
use crate::handler::ProtocolHandler;
use crate::options::Options;

fn init_logger(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init();
}

/// Main application entry point: parse options, load config, then either
/// run a discovery scan or start one poll task per configured inverter.
pub async fn app(shutdown_tx: broadcast::Sender<()>) -> Result<()> {
    let options = Options::new();

    init_logger("info");
    info!(
        "starting goodwe-bridge {} with config file: {}",
        CARGO_PKG_VERSION, options.config_file
    );

    let config = Config::new(options.config_file.clone()).unwrap_or_else(|err| {
        error!("failed to load config: {:?}", err);
        std::process::exit(255);
    });
    init_logger(&config.loglevel());

    if options.discover {
        return run_discovery(&config).await;
    }

    let mut handles = Vec::new();
    for inverter in config.enabled_inverters().cloned() {
        let shutdown_rx = shutdown_tx.subscribe();
        let device_info = options.device_info;
        handles.push(tokio::spawn(async move {
            if let Err(e) = poll_inverter(inverter, device_info, shutdown_rx).await {
                error!("inverter task failed: {:#}", e);
            }
        }));
    }

    if handles.is_empty() {
        warn!("no enabled inverters in config");
        return Ok(());
    }

    for handle in handles {
        if let Err(e) = handle.await {
            error!("error waiting for inverter task: {}", e);
        }
    }

    info!("shutdown complete");
    Ok(())
}

async fn run_discovery(config: &Config) -> Result<()> {
    info!(
        "discovering inverters via {} ({}ms window)",
        config.discovery.broadcast_address,
        config.discovery.timeout.as_millis()
    );

    let found = discovery::discover(config.discovery.timeout, &config.discovery.broadcast_address)
        .await?;

    info!("found {} inverter(s)", found.len());
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}

async fn poll_inverter(
    inverter: config::Inverter,
    device_info: bool,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let host = inverter.host().to_string();
    let interval = inverter.poll_interval();

    let mut handler = ProtocolHandler::new(&inverter)?;

    // log state transitions as they happen
    let mut handler_events = handler.subscribe();
    let event_host = host.clone();
    tokio::spawn(async move {
        while let Ok(event) = handler_events.recv().await {
            debug!(
                "{}: {}",
                event_host,
                serde_json::to_string(&event).unwrap_or_default()
            );
        }
    });

    if device_info {
        match handler.read_device_info().await {
            Ok(info) => info!("{}: {}", host, serde_json::to_string(&info)?),
            Err(e) => warn!("{}: device info failed: {} (code {})", host, e, e.code()),
        }
    }

    loop {
        match handler.read_runtime_data().await {
            Ok(map) => info!("{}: {}", host, serde_json::to_string(&map)?),
            Err(e) => warn!(
                "{}: read failed: {} (code {}, {} consecutive)",
                host,
                e,
                e.code(),
                handler.consecutive_failures()
            ),
        }

        tokio::select! {
            _ = shutdown_rx.recv() => {
                handler.disconnect().await;
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Application entry point: wires ctrl-c into a shutdown broadcast and runs
/// the app.
pub async fn run() -> Result<()> {
    let (shutdown_tx, _) = broadcast::channel(1);

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl+c: {}", e);
        }
        let _ = shutdown_tx_clone.send(());
    });

    app(shutdown_tx).await
}
