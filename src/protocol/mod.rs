pub mod aa55;
pub mod modbus;

use enum_dispatch::enum_dispatch;

use crate::error::{Error, Result};
use crate::family::{FamilyConfig, FamilyProtocol};
use crate::transport::TransportKind;

use modbus::TransactionSeq;

/// Per-protocol frame construction, validation and payload extraction.
/// A codec is chosen once when the handler is built; the handler never
/// branches on protocol again.
#[enum_dispatch]
pub trait FrameCodec {
    /// Next runtime-data request frame. Mutable because the TCP codec
    /// consumes a transaction id per request.
    fn runtime_request(&mut self) -> Result<Vec<u8>>;

    /// Expected response length in bytes, where the protocol fixes one.
    fn expected_len(&self) -> Option<usize>;

    fn validate(&self, frame: &[u8]) -> Result<()>;

    fn extract(&self, frame: &[u8]) -> Result<Vec<u8>>;
}

#[enum_dispatch(FrameCodec)]
pub enum Codec {
    Aa55(Aa55Codec),
    ModbusRtu(RtuCodec),
    ModbusTcp(TcpCodec),
}

impl Codec {
    /// Selects the codec for a family/transport pairing: storage-class
    /// families always speak AA55; Modbus families speak RTU framing over
    /// UDP and MBAP over TCP.
    pub fn for_connection(
        family: &FamilyConfig,
        transport: TransportKind,
        comm_addr: u8,
    ) -> Result<Codec> {
        match family.protocol {
            FamilyProtocol::Aa55 => Ok(Aa55Codec::new().into()),
            FamilyProtocol::Modbus => {
                let (start, count) = match (family.register_start, family.register_count) {
                    (Some(start), Some(count)) => (start, count),
                    _ => {
                        return Err(Error::validation(
                            "modbus family table missing register window",
                        ))
                    }
                };

                match transport {
                    TransportKind::Udp => Ok(RtuCodec::new(comm_addr, start, count).into()),
                    TransportKind::Tcp => Ok(TcpCodec::new(comm_addr, start, count).into()),
                }
            }
        }
    }
}

#[derive(Default)]
pub struct Aa55Codec;

impl Aa55Codec {
    pub fn new() -> Self {
        Self
    }
}

impl FrameCodec for Aa55Codec {
    fn runtime_request(&mut self) -> Result<Vec<u8>> {
        aa55::build_request_hex(aa55::READ_RUNTIME_COMMAND)
    }

    fn expected_len(&self) -> Option<usize> {
        None
    }

    fn validate(&self, frame: &[u8]) -> Result<()> {
        aa55::validate(frame, Some(aa55::READ_RUNTIME_RESPONSE))
    }

    fn extract(&self, frame: &[u8]) -> Result<Vec<u8>> {
        aa55::extract(frame)
    }
}

pub struct RtuCodec {
    comm_addr: u8,
    register_start: u16,
    register_count: u16,
}

impl RtuCodec {
    pub fn new(comm_addr: u8, register_start: u16, register_count: u16) -> Self {
        Self {
            comm_addr,
            register_start,
            register_count,
        }
    }
}

impl FrameCodec for RtuCodec {
    fn runtime_request(&mut self) -> Result<Vec<u8>> {
        Ok(modbus::build_rtu_read(
            self.comm_addr,
            self.register_start,
            self.register_count,
        ))
    }

    fn expected_len(&self) -> Option<usize> {
        // AA55 prefix + addr + function + byte count + payload + CRC
        Some(5 + usize::from(self.register_count) * 2 + 2)
    }

    fn validate(&self, frame: &[u8]) -> Result<()> {
        modbus::validate_rtu(frame, modbus::FUNCTION_READ, self.register_count)
    }

    fn extract(&self, frame: &[u8]) -> Result<Vec<u8>> {
        modbus::extract_rtu(frame)
    }
}

pub struct TcpCodec {
    seq: TransactionSeq,
    comm_addr: u8,
    register_start: u16,
    register_count: u16,
}

impl TcpCodec {
    pub fn new(comm_addr: u8, register_start: u16, register_count: u16) -> Self {
        Self {
            seq: TransactionSeq::new(),
            comm_addr,
            register_start,
            register_count,
        }
    }

    pub fn reset_transaction_ids(&mut self) {
        self.seq.reset();
    }
}

impl FrameCodec for TcpCodec {
    fn runtime_request(&mut self) -> Result<Vec<u8>> {
        Ok(modbus::build_tcp_read(
            self.seq.next(),
            self.comm_addr,
            self.register_start,
            self.register_count,
        ))
    }

    fn expected_len(&self) -> Option<usize> {
        Some(9 + usize::from(self.register_count) * 2)
    }

    fn validate(&self, frame: &[u8]) -> Result<()> {
        modbus::validate_tcp(frame, modbus::FUNCTION_READ, self.register_count)
    }

    fn extract(&self, frame: &[u8]) -> Result<Vec<u8>> {
        modbus::extract_tcp(frame)
    }
}
