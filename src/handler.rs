use log::{debug, info};

use crate::config;
use crate::error::{Error, Result};
use crate::events::{self, HandlerEvent};
use crate::family::{self, FamilyConfig};
use crate::protocol::{aa55, Codec, FrameCodec};
use crate::protocol::aa55::DeviceInfo;
use crate::retry;
use crate::sensor::SensorMap;
use crate::transport::{self, Transport};

/// Connection state of one handler. Reading is a transient sub-state of
/// Connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
    Reading,
}

/// Session with one inverter: owns the socket, the codec chosen for the
/// family/transport pairing, and the retry/failure accounting.
///
/// A handler supports at most one in-flight request; callers must serialize
/// overlapping calls themselves. `&mut self` on every operation enforces
/// this within safe Rust.
pub struct ProtocolHandler {
    inverter: config::Inverter,
    family: &'static FamilyConfig,
    codec: Codec,
    transport: Box<dyn Transport + Send>,
    state: LinkState,
    consecutive_failures: u32,
    last_error: Option<String>,
    events: events::Sender,
}

impl std::fmt::Debug for ProtocolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolHandler")
            .field("state", &self.state)
            .field("consecutive_failures", &self.consecutive_failures)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl ProtocolHandler {
    pub fn new(inverter: &config::Inverter) -> Result<Self> {
        let family = family::resolve(inverter.family())?;
        let codec = Codec::for_connection(family, inverter.transport(), inverter.comm_addr())?;
        let transport = transport::create(
            inverter.transport(),
            inverter.host().to_string(),
            inverter.port(),
            inverter.timeout(),
        );

        Ok(Self {
            inverter: inverter.clone(),
            family,
            codec,
            transport,
            state: LinkState::Disconnected,
            consecutive_failures: 0,
            last_error: None,
            events: events::channel(),
        })
    }

    /// Subscribes to this handler's state transition events.
    pub fn subscribe(&self) -> events::Receiver {
        self.events.subscribe()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// No-op when already connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.transport.is_connected() {
            return Ok(());
        }

        self.state = LinkState::Connecting;
        events::emit(&self.events, HandlerEvent::Connecting);

        match self.transport.connect().await {
            Ok(()) => {
                self.state = LinkState::Connected;
                events::emit(&self.events, HandlerEvent::Connected);
                info!("{}: connected", self.inverter.host());
                Ok(())
            }
            Err(e) => {
                self.state = LinkState::Disconnected;
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Reads the family's runtime block and decodes it into a sparse sensor
    /// map. Any failure is wrapped as a read error carrying the cause.
    pub async fn read_runtime_data(&mut self) -> Result<SensorMap> {
        self.connect().await.map_err(Error::read)?;

        self.state = LinkState::Reading;
        events::emit(&self.events, HandlerEvent::Reading);

        let result = self.read_runtime_inner().await;

        self.state = if self.transport.is_connected() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };

        match result {
            Ok(map) => {
                self.consecutive_failures = 0;
                debug!("{}: decoded {} sensors", self.inverter.host(), map.len());
                Ok(map)
            }
            Err(e) => {
                self.record_error(&e);
                Err(Error::read(e))
            }
        }
    }

    async fn read_runtime_inner(&mut self) -> Result<SensorMap> {
        let frame = self.codec.runtime_request()?;
        let expected = self.codec.expected_len();

        let response = match retry::send_with_retry(
            self.transport.as_mut(),
            &frame,
            expected,
            self.inverter.retries(),
            &self.events,
        )
        .await
        {
            Ok(response) => response,
            Err(e) => {
                self.consecutive_failures += 1;
                return Err(e);
            }
        };

        self.codec.validate(&response)?;
        let payload = self.codec.extract(&response)?;
        Ok(self.family.parse(&payload))
    }

    /// Device info is always an AA55 exchange, whatever the family's runtime
    /// protocol; every GoodWe answers `010100` with a `0181` payload.
    pub async fn read_device_info(&mut self) -> Result<DeviceInfo> {
        self.connect().await?;

        self.state = LinkState::Reading;
        events::emit(&self.events, HandlerEvent::Reading);

        let result = self.read_device_info_inner().await;

        self.state = if self.transport.is_connected() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };

        if let Err(e) = &result {
            self.record_error(e);
        }
        result
    }

    async fn read_device_info_inner(&mut self) -> Result<DeviceInfo> {
        let frame = aa55::build_request_hex(aa55::DEVICE_INFO_COMMAND)?;

        let response = match retry::send_with_retry(
            self.transport.as_mut(),
            &frame,
            None,
            self.inverter.retries(),
            &self.events,
        )
        .await
        {
            Ok(response) => response,
            Err(e) => {
                self.consecutive_failures += 1;
                return Err(e);
            }
        };

        aa55::validate(&response, Some(aa55::DEVICE_INFO_RESPONSE))?;
        let payload = aa55::extract(&response)?;
        DeviceInfo::decode(&payload)
    }

    /// Tears down the socket and resets session state. The handler can be
    /// reconnected afterwards.
    pub async fn disconnect(&mut self) {
        self.transport.disconnect();
        self.state = LinkState::Disconnected;
        self.consecutive_failures = 0;
        self.last_error = None;
        events::emit(&self.events, HandlerEvent::Disconnected);
        info!("{}: disconnected", self.inverter.host());
    }

    fn record_error(&mut self, e: &Error) {
        self.last_error = Some(e.to_string());
        events::emit(
            &self.events,
            HandlerEvent::Error {
                message: e.to_string(),
            },
        );
    }
}
