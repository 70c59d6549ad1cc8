use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the protocol engine. Every variant carries a stable
/// machine-readable code so callers can dispatch without string matching.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid response: {0}")]
    Validation(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("unsupported inverter family: {0}")]
    UnsupportedFamily(String),

    #[error("read failed: {source}")]
    Read {
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Wraps any engine error as a read failure, preserving the cause.
    pub fn read(source: Error) -> Self {
        Self::Read {
            source: Box::new(source),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::UnsupportedFamily(_) => "UNSUPPORTED_FAMILY",
            Self::Read { .. } => "READ_ERROR",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
