use super::Sequence;
use crate::config::MAX_PROBES;
use parking_lot::Mutex;
use std::time::Instant;

/// The state of a single probe slot.
#[derive(Debug, Clone, Copy, Default)]
struct Probe {
    sent: Option<Instant>,
    outstanding: bool,
}

/// Fixed table of probes indexed by sequence number.
///
/// The sender marks a slot outstanding when it emits a request and the receiver clears it
/// when the matching reply arrives, so each request is answered at most once.
#[derive(Debug)]
pub struct ProbeTable {
    probes: Mutex<[Probe; MAX_PROBES]>,
}

impl Default for ProbeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            probes: Mutex::new([Probe::default(); MAX_PROBES]),
        }
    }

    /// Record that a request for `sequence` is being sent now and return the send time.
    ///
    /// Sequences outside the table are not recorded.
    pub fn record_sent(&self, sequence: Sequence) -> Instant {
        let now = Instant::now();
        if let Some(probe) = self.probes.lock().get_mut(usize::from(sequence)) {
            *probe = Probe {
                sent: Some(now),
                outstanding: true,
            };
        }
        now
    }

    /// Take the send time of an outstanding probe, clearing it.
    ///
    /// Returns `None` if no request is outstanding for `sequence`, which is the case for
    /// late, duplicate and unsolicited replies.
    pub fn try_consume(&self, sequence: Sequence) -> Option<Instant> {
        let mut probes = self.probes.lock();
        let probe = probes.get_mut(usize::from(sequence))?;
        if probe.outstanding {
            probe.outstanding = false;
            probe.sent
        } else {
            None
        }
    }
}
