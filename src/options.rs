use clap::Parser;

/// GoodWe Bridge - local-network polling for GoodWe inverters
#[derive(Debug, Clone, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_file: String,

    /// Broadcast a discovery probe, print what answers, and exit
    #[clap(long = "discover")]
    pub discover: bool,

    /// Print each inverter's device info before polling
    #[clap(long = "device-info")]
    pub device_info: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}
