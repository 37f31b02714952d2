use crate::error::{Error, Result};
use crate::ping::icmp::ICMP_HEADER_SIZE;
use std::time::Duration;

/// Number of probe slots, and so the number of requests a session sends.
pub const MAX_PROBES: usize = 64;

/// Largest Echo Request we build, header included.
pub const MAX_PACKET_SIZE: usize = 128;

/// Largest Echo Request payload.
pub const MAX_PAYLOAD_SIZE: usize = MAX_PACKET_SIZE - ICMP_HEADER_SIZE;

/// Largest datagram read from the socket.
pub const MAX_RECV_SIZE: usize = 512;

/// Kernel receive buffer requested for the raw socket.
pub const RECV_BUFFER_SIZE: usize = 128 * 1024;

/// Longest target name accepted on the command line.
pub const MAX_HOSTNAME_LEN: usize = 63;

pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_micros(200);
pub const DEFAULT_PAYLOAD_SIZE: usize = 56;

/// Size of the IPv4 and ICMP headers in front of the payload, as shown on the intro line.
pub const HEADERS_SIZE: usize = 20 + ICMP_HEADER_SIZE;

/// Tunables of a probe [`crate::Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub send_interval: Duration,
    pub poll_timeout: Duration,
    pub payload_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            send_interval: DEFAULT_SEND_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            payload_size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

impl SessionConfig {
    /// Check the payload fits in [`MAX_PACKET_SIZE`] and the poll timeout is non-zero.
    ///
    /// A zero read timeout makes the socket block forever, so the receiver would never
    /// observe a stop.
    pub fn validate(&self) -> Result<()> {
        if self.payload_size > MAX_PAYLOAD_SIZE {
            return Err(Error::InvalidPayloadSize(self.payload_size));
        }
        if self.poll_timeout.is_zero() {
            return Err(Error::InvalidPollTimeout(self.poll_timeout));
        }
        Ok(())
    }
}
