use super::Session;
use crate::config::MAX_PROBES;
use crate::net::Transport;
use crate::ping::icmp::encode_request;
use crate::ping::Sequence;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::instrument;

/// Emit one Echo Request per interval until the session stops or the probe table is full.
pub(super) async fn run<T: Transport>(session: Arc<Session<T>>) {
    let mut sequence = Sequence(0);
    while session.is_alive() && usize::from(sequence) < MAX_PROBES {
        send_probe(&session, sequence);
        sequence.0 += 1;
        tokio::select! {
            () = tokio::time::sleep(session.config.send_interval) => {}
            () = session.shutdown.notified() => break,
        }
    }
    tracing::debug!(sent = sequence.0, "sender stopped");
}

/// Send a single probe.
///
/// A failed send still counts as transmitted and uses up its sequence number.
#[instrument(skip(session), level = "trace")]
fn send_probe<T: Transport>(session: &Session<T>, sequence: Sequence) {
    let packet = match encode_request(sequence, session.identifier, session.config.payload_size)
    {
        Ok(packet) => packet,
        Err(err) => {
            tracing::error!(%err, "failed to encode echo request");
            return;
        }
    };
    session.send_count.fetch_add(1, Ordering::SeqCst);
    session.probes.record_sent(sequence);
    if let Err(err) = session.transport.send_to(&packet, session.target) {
        tracing::warn!(%err, %sequence, "failed to send echo request");
    }
}
