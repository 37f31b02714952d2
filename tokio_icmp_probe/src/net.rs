use crate::config::{MAX_HOSTNAME_LEN, RECV_BUFFER_SIZE};
use crate::error::{Error, IoOperation, Result};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::{self, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};
use std::time::Duration;
use tracing::instrument;

/// A datagram transport shared by the sender and the receiver.
///
/// Sends and receives are independent operations and may run concurrently from different
/// threads.
pub trait Transport: Send + Sync + 'static {
    /// Send one ICMP message to `target`.
    fn send_to(&self, packet: &[u8], target: Ipv4Addr) -> io::Result<usize>;

    /// Wait a bounded time for one IPv4 datagram.
    ///
    /// Returns `Ok(None)` if nothing arrived before the wait elapsed.
    fn recv(&self, buf: &mut [u8]) -> io::Result<Option<usize>>;
}

/// A raw IPv4 ICMP socket.
///
/// Opening it requires `CAP_NET_RAW` (or root) on Linux.
#[derive(Debug)]
pub struct RawSocket {
    inner: Socket,
}

impl RawSocket {
    /// Open the socket; every `recv` waits at most `poll_timeout`.
    #[instrument(level = "trace")]
    pub fn open(poll_timeout: Duration) -> Result<Self> {
        let inner = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
            .map_err(|err| Error::Io(err, IoOperation::NewSocket))?;
        inner
            .set_recv_buffer_size(RECV_BUFFER_SIZE)
            .map_err(|err| Error::Io(err, IoOperation::SetRecvBufferSize))?;
        inner
            .set_read_timeout(Some(poll_timeout))
            .map_err(|err| Error::Io(err, IoOperation::SetReadTimeout))?;
        Ok(Self { inner })
    }
}

impl Transport for RawSocket {
    #[instrument(skip(self, packet), level = "trace")]
    fn send_to(&self, packet: &[u8], target: Ipv4Addr) -> io::Result<usize> {
        self.inner
            .send_to(packet, &SockAddr::from(SocketAddrV4::new(target, 0)))
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        match (&self.inner).read(buf) {
            Ok(bytes_read) => Ok(Some(bytes_read)),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Resolve a target name or dotted-decimal address to an IPv4 address.
#[instrument(level = "trace")]
pub fn resolve_target(target: &str) -> Result<Ipv4Addr> {
    if target.is_empty() || target.len() > MAX_HOSTNAME_LEN {
        return Err(Error::InvalidTarget(target.to_string()));
    }
    if let Ok(addr) = target.parse::<Ipv4Addr>() {
        return Ok(addr);
    }
    dns_lookup::lookup_host(target)
        .map_err(|err| Error::Resolve(target.to_string(), err))?
        .into_iter()
        .find_map(|addr| match addr {
            IpAddr::V4(addr) => Some(addr),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| Error::NoIpv4Address(target.to_string()))
}
