use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer};
use serde_with::serde_as;

use crate::family;
use crate::transport::TransportKind;

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub inverters: Vec<Inverter>,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    #[serde(default)]
    pub discovery: Discovery,
}

// Inverter {{{
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Inverter {
    #[serde(default = "Config::default_enabled")]
    pub enabled: bool,

    pub host: String,

    #[serde(default = "Config::default_port")]
    pub port: u16,

    #[serde(default = "Config::default_transport")]
    pub transport: TransportKind,

    pub family: String,

    #[serde_as(as = "Option<serde_with::DurationMilliSeconds>")]
    #[serde(default, rename = "timeout_ms")]
    pub timeout: Option<Duration>,

    pub retries: Option<usize>,

    /// Modbus unit address; `auto` (or omitted) resolves from the family.
    #[serde(default, deserialize_with = "de_comm_addr")]
    pub comm_addr: Option<u8>,

    pub poll_interval_secs: Option<u64>,
}

impl Inverter {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(Duration::from_millis(1000))
    }

    pub fn retries(&self) -> usize {
        self.retries.unwrap_or(3)
    }

    pub fn comm_addr(&self) -> u8 {
        self.comm_addr
            .unwrap_or_else(|| family::default_comm_addr(&self.family))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.unwrap_or(30))
    }
} // }}}

// Discovery {{{
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Discovery {
    #[serde(default = "Config::default_broadcast_address")]
    pub broadcast_address: String,

    #[serde_as(as = "serde_with::DurationMilliSeconds")]
    #[serde(default = "Config::default_discovery_timeout", rename = "timeout_ms")]
    pub timeout: Duration,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            broadcast_address: Config::default_broadcast_address(),
            timeout: Config::default_discovery_timeout(),
        }
    }
} // }}}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| anyhow!("error reading {}: {}", file, err))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|err| anyhow!("error parsing {}: {}", file, err))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for inverter in &self.inverters {
            family::resolve(&inverter.family)
                .map_err(|e| anyhow!("inverter {}: {}", inverter.host, e))?;
        }
        Ok(())
    }

    pub fn loglevel(&self) -> String {
        self.loglevel.clone()
    }

    pub fn enabled_inverters(&self) -> impl Iterator<Item = &Inverter> {
        self.inverters.iter().filter(|i| i.enabled())
    }

    fn default_enabled() -> bool {
        true
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }

    fn default_port() -> u16 {
        8899
    }

    fn default_transport() -> TransportKind {
        TransportKind::Udp
    }

    fn default_broadcast_address() -> String {
        "255.255.255.255".to_string()
    }

    fn default_discovery_timeout() -> Duration {
        Duration::from_millis(2000)
    }
}

fn de_comm_addr<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Addr(u8),
        Auto(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Addr(addr)) => Ok(Some(addr)),
        Some(Raw::Auto(s)) if s.eq_ignore_ascii_case("auto") => Ok(None),
        Some(Raw::Auto(s)) => Err(serde::de::Error::custom(format!(
            "comm_addr must be a byte or \"auto\", got {s:?}"
        ))),
    }
}
