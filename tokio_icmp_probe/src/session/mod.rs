//! The probe session: one sender and one receiver sharing a probe table.

mod receiver;
mod sender;
mod stats;

pub use receiver::ProbeReply;
pub use stats::{RttSummary, Statistics};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::net::Transport;
use crate::ping::probe::ProbeTable;
use crate::ping::Identifier;
use parking_lot::Mutex;
use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Notify};

/// State shared by the sender and the receiver of a probe session.
///
/// Note that only the counters, flag and tables are mutable, each with its own
/// synchronisation.
#[derive(Debug)]
pub struct Session<T: Transport> {
    config: SessionConfig,
    target: Ipv4Addr,
    identifier: Identifier,
    transport: T,
    probes: ProbeTable,
    send_count: AtomicUsize,
    recv_count: AtomicUsize,
    alive: AtomicBool,
    shutdown: Notify,
    stopped: Notify,
    rtt: Mutex<RttSummary>,
    replies: mpsc::UnboundedSender<ProbeReply>,
}

impl<T: Transport> Session<T> {
    /// Create a session probing `target` over `transport`.
    ///
    /// Matched replies are delivered on the returned channel, which closes once the
    /// session has been run to completion and dropped.
    pub fn new(
        config: SessionConfig,
        target: Ipv4Addr,
        identifier: Identifier,
        transport: T,
    ) -> Result<(Arc<Self>, mpsc::UnboundedReceiver<ProbeReply>)> {
        config.validate()?;
        let (replies, replies_rx) = mpsc::unbounded_channel();
        let session = Self {
            config,
            target,
            identifier,
            transport,
            probes: ProbeTable::new(),
            send_count: AtomicUsize::new(0),
            recv_count: AtomicUsize::new(0),
            alive: AtomicBool::new(true),
            shutdown: Notify::new(),
            stopped: Notify::new(),
            rtt: Mutex::new(RttSummary::default()),
            replies,
        };
        Ok((Arc::new(session), replies_rx))
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Ask both loops to stop.
    ///
    /// Only flips the alive flag and wakes the sender and [`Session::run`], so it is safe
    /// to call from an interrupt handler.  A stop requested before `run` makes `run` return
    /// without sending anything.
    pub fn stop(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.shutdown.notify_one();
            self.stopped.notify_one();
        }
    }

    /// Run the sender and receiver until `interrupt` completes or [`Session::stop`] is
    /// called, then gather statistics.
    ///
    /// The sender also stops by itself once every probe slot has been used; the receiver
    /// keeps collecting late replies until the interrupt.
    pub async fn run<F>(self: Arc<Self>, interrupt: F) -> Statistics
    where
        F: Future<Output = ()>,
    {
        tracing::debug!(addr = %self.target, identifier = self.identifier.0, "session starting");
        let start = Instant::now();
        let receiver = tokio::task::spawn_blocking({
            let session = Arc::clone(&self);
            move || receiver::run(&session)
        });
        let sender = tokio::spawn(sender::run(Arc::clone(&self)));
        tokio::select! {
            () = interrupt => {}
            () = self.stopped.notified() => {}
        }
        self.stop();
        let elapsed = start.elapsed();
        if let Err(err) = sender.await {
            tracing::error!(%err, "sender task failed");
        }
        if let Err(err) = receiver.await {
            tracing::error!(%err, "receiver task failed");
        }
        let statistics = self.statistics(elapsed);
        tracing::debug!(?statistics, "session stopped");
        statistics
    }

    /// Snapshot the counters.
    ///
    /// The receive count is read first so the snapshot never shows more replies than
    /// requests.
    fn statistics(&self, elapsed: std::time::Duration) -> Statistics {
        let received = self.recv_count.load(Ordering::SeqCst);
        let transmitted = self.send_count.load(Ordering::SeqCst);
        let rtt = *self.rtt.lock();
        Statistics {
            transmitted,
            received,
            elapsed,
            rtt: (rtt.count() > 0).then_some(rtt),
        }
    }
}
