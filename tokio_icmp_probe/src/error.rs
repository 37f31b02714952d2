use std::fmt::{Display, Formatter};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// A probe error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A probe setup error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid payload size: {0}")]
    InvalidPayloadSize(usize),
    #[error("invalid poll timeout: {0:?}")]
    InvalidPollTimeout(Duration),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("failed to resolve {0}: {1}")]
    Resolve(String, io::Error),
    #[error("no IPv4 address found for {0}")]
    NoIpv4Address(String),
    #[error("failed to {1}: {0}")]
    Io(io::Error, IoOperation),
}

/// Reasons an inbound datagram is not an Echo Reply for this session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("packet too short: {0} bytes")]
    TooShort(usize),
    #[error("not an echo reply: icmp type {0}")]
    WrongType(u8),
    #[error("identifier mismatch: expected {expected}, got {actual}")]
    IdentifierMismatch { expected: u16, actual: u16 },
    #[error("sequence {0} out of range")]
    SequenceOutOfRange(u16),
}

/// Socket operation which failed.
#[derive(Debug)]
pub enum IoOperation {
    NewSocket,
    SetRecvBufferSize,
    SetReadTimeout,
}

impl Display for IoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewSocket => write!(f, "create raw socket"),
            Self::SetRecvBufferSize => write!(f, "set receive buffer size"),
            Self::SetReadTimeout => write!(f, "set read timeout"),
        }
    }
}
