use super::Session;
use crate::config::MAX_RECV_SIZE;
use crate::error::DecodeError;
use crate::net::Transport;
use crate::ping::icmp::{decode_reply, EchoReply};
use std::fmt::{Display, Formatter};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

/// A reply matched to an outstanding probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReply {
    pub reply: EchoReply,
    pub rtt: Duration,
}

impl Display for ProbeReply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} byte from {}: icmp_seq={} ttl={} rtt={} ms",
            self.reply.length,
            self.reply.source,
            self.reply.sequence,
            self.reply.ttl,
            self.rtt.as_millis()
        )
    }
}

/// Poll the transport until the session stops.
///
/// Each wait is bounded by the transport so the alive flag is re-checked at least once per
/// poll timeout.
pub(super) fn run<T: Transport>(session: &Session<T>) {
    let mut buf = [0u8; MAX_RECV_SIZE];
    while session.is_alive() {
        match session.transport.recv(&mut buf) {
            Ok(None) => {}
            Ok(Some(bytes_read)) => {
                if let Some(reply) = handle_datagram(session, &buf[..bytes_read]) {
                    let _ = session.replies.send(reply);
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to receive datagram");
                std::thread::sleep(session.config.poll_timeout);
            }
        }
    }
    tracing::debug!("receiver stopped");
}

/// Decode a datagram and match it against the probe table.
///
/// Returns `None` for foreign, malformed, late and duplicate replies.
fn handle_datagram<T: Transport>(session: &Session<T>, buf: &[u8]) -> Option<ProbeReply> {
    let reply = match decode_reply(buf, session.identifier) {
        Ok(reply) => reply,
        Err(err @ (DecodeError::WrongType(_) | DecodeError::IdentifierMismatch { .. })) => {
            tracing::debug!(%err, "ignoring datagram");
            return None;
        }
        Err(err) => {
            tracing::warn!(%err, "invalid echo reply");
            return None;
        }
    };
    let sent = session.probes.try_consume(reply.sequence)?;
    let rtt = Instant::now().saturating_duration_since(sent);
    session.rtt.lock().record(rtt);
    session.recv_count.fetch_add(1, Ordering::SeqCst);
    Some(ProbeReply { reply, rtt })
}
