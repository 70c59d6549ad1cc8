use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use log::debug;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::{timeout, Instant};

use crate::error::{Error, Result};

const UDP_RECV_BUFFER: usize = 4096;

/// How long a TCP read with no fixed expected length waits after the last
/// byte before treating the response as complete.
const TCP_QUIESCENCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Udp,
    #[serde(alias = "modbus")]
    Tcp,
}

/// One socket, exclusively owned by one handler. Implementations wrap
/// either a UDP datagram socket or a TCP stream.
#[async_trait]
pub trait Transport: Send {
    async fn connect(&mut self) -> Result<()>;

    /// Sends one request frame and returns the response bytes, bounded by
    /// the configured timeout.
    async fn send_command(&mut self, frame: &[u8], expected_len: Option<usize>)
        -> Result<Vec<u8>>;

    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;
}

pub fn create(
    kind: TransportKind,
    host: String,
    port: u16,
    timeout: Duration,
) -> Box<dyn Transport + Send> {
    match kind {
        TransportKind::Udp => Box::new(UdpTransport::new(host, port, timeout)),
        TransportKind::Tcp => Box::new(TcpTransport::new(host, port, timeout)),
    }
}

fn not_connected() -> Error {
    Error::Connection(io::Error::new(io::ErrorKind::NotConnected, "not connected"))
}

pub struct UdpTransport {
    host: String,
    port: u16,
    timeout: Duration,
    socket: Option<UdpSocket>,
}

impl UdpTransport {
    pub fn new(host: String, port: u16, timeout: Duration) -> Self {
        Self {
            host,
            port,
            timeout,
            socket: None,
        }
    }
}

#[async_trait]
impl Transport for UdpTransport {
    /// UDP is connectionless; this just binds an ephemeral socket and fixes
    /// the peer address.
    async fn connect(&mut self) -> Result<()> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect((self.host.as_str(), self.port)).await?;
        debug!("udp transport ready for {}:{}", self.host, self.port);
        self.socket = Some(socket);
        Ok(())
    }

    async fn send_command(
        &mut self,
        frame: &[u8],
        _expected_len: Option<usize>,
    ) -> Result<Vec<u8>> {
        let socket = self.socket.as_ref().ok_or_else(not_connected)?;

        socket.send(frame).await?;

        let mut buf = vec![0u8; UDP_RECV_BUFFER];
        match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                buf.truncate(len);
                Ok(buf)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(Error::Timeout(self.timeout)),
        }
    }

    fn disconnect(&mut self) {
        self.socket = None;
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }
}

pub struct TcpTransport {
    host: String,
    port: u16,
    timeout: Duration,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    pub fn new(host: String, port: u16, timeout: Duration) -> Self {
        Self {
            host,
            port,
            timeout,
            stream: None,
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        let addr = (self.host.as_str(), self.port);
        let stream = match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(Error::Timeout(self.timeout)),
        };

        debug!("tcp transport connected to {}:{}", self.host, self.port);
        self.stream = Some(stream);
        Ok(())
    }

    async fn send_command(
        &mut self,
        frame: &[u8],
        expected_len: Option<usize>,
    ) -> Result<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;

        match timeout(self.timeout, stream.write_all(frame)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(Error::Timeout(self.timeout)),
        }

        let deadline = Instant::now() + self.timeout;
        let mut buf = BytesMut::with_capacity(expected_len.unwrap_or(1024));

        match expected_len {
            // Accumulate until the protocol-declared length is reached.
            Some(expected) => {
                while buf.len() < expected {
                    let remaining = deadline
                        .checked_duration_since(Instant::now())
                        .ok_or(Error::Timeout(self.timeout))?;

                    match timeout(remaining, stream.read_buf(&mut buf)).await {
                        Ok(Ok(0)) => {
                            return Err(Error::Connection(io::Error::new(
                                io::ErrorKind::UnexpectedEof,
                                "connection closed by peer",
                            )))
                        }
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => return Err(e.into()),
                        Err(_) => return Err(Error::Timeout(self.timeout)),
                    }
                }
            }

            // No length to aim for: wait for the first bytes within the
            // timeout, then stop once the line goes quiet.
            None => loop {
                let window = if buf.is_empty() {
                    deadline
                        .checked_duration_since(Instant::now())
                        .ok_or(Error::Timeout(self.timeout))?
                } else {
                    TCP_QUIESCENCE
                };

                match timeout(window, stream.read_buf(&mut buf)).await {
                    Ok(Ok(0)) => {
                        if buf.is_empty() {
                            return Err(Error::Connection(io::Error::new(
                                io::ErrorKind::UnexpectedEof,
                                "connection closed by peer",
                            )));
                        }
                        break;
                    }
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => return Err(e.into()),
                    Err(_) => {
                        if buf.is_empty() {
                            return Err(Error::Timeout(self.timeout));
                        }
                        break;
                    }
                }
            },
        }

        Ok(buf.to_vec())
    }

    fn disconnect(&mut self) {
        self.stream = None;
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
