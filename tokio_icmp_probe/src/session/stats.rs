use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Running min/avg/max of round-trip times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RttSummary {
    min: Duration,
    max: Duration,
    total: Duration,
    count: u32,
}

impl RttSummary {
    pub(crate) fn record(&mut self, rtt: Duration) {
        if self.count == 0 || rtt < self.min {
            self.min = rtt;
        }
        self.max = self.max.max(rtt);
        self.total += rtt;
        self.count += 1;
    }

    #[must_use]
    pub(crate) const fn count(&self) -> u32 {
        self.count
    }

    const fn min(&self) -> Duration {
        self.min
    }

    const fn max(&self) -> Duration {
        self.max
    }

    fn avg(&self) -> Duration {
        self.total.checked_div(self.count).unwrap_or_default()
    }
}

/// Final statistics of a probe session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub transmitted: usize,
    pub received: usize,
    pub elapsed: Duration,
    pub rtt: Option<RttSummary>,
}

impl Statistics {
    /// Percentage of requests without a reply, rounded down.
    ///
    /// A session which sent nothing has lost nothing.
    #[must_use]
    pub fn loss_percent(&self) -> usize {
        if self.transmitted == 0 {
            return 0;
        }
        self.transmitted.saturating_sub(self.received) * 100 / self.transmitted
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} packets transmitted, {} received, {}% packet loss, time {}ms",
            self.transmitted,
            self.received,
            self.loss_percent(),
            self.elapsed.as_millis()
        )?;
        if let Some(rtt) = &self.rtt {
            write!(
                f,
                "\nrtt min/avg/max = {:.3}/{:.3}/{:.3} ms",
                as_millis_f64(rtt.min()),
                as_millis_f64(rtt.avg()),
                as_millis_f64(rtt.max())
            )?;
        }
        Ok(())
    }
}

fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn stats(transmitted: usize, received: usize) -> Statistics {
        Statistics {
            transmitted,
            received,
            elapsed: Duration::from_millis(9012),
            rtt: None,
        }
    }

    #[test_case(10, 10, 0; "no loss")]
    #[test_case(10, 7, 30; "partial loss")]
    #[test_case(10, 0, 100; "total loss")]
    #[test_case(3, 1, 66; "rounds down")]
    #[test_case(0, 0, 0; "nothing sent")]
    fn test_loss_percent(transmitted: usize, received: usize, expected: usize) {
        assert_eq!(expected, stats(transmitted, received).loss_percent());
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            "10 packets transmitted, 7 received, 30% packet loss, time 9012ms",
            stats(10, 7).to_string()
        );
    }

    #[test]
    fn test_summary_line_nothing_sent() {
        assert_eq!(
            "0 packets transmitted, 0 received, 0% packet loss, time 9012ms",
            stats(0, 0).to_string()
        );
    }

    #[test]
    fn test_summary_with_rtt() {
        let mut rtt = RttSummary::default();
        rtt.record(Duration::from_micros(1500));
        rtt.record(Duration::from_micros(500));
        rtt.record(Duration::from_micros(2500));
        let statistics = Statistics {
            rtt: Some(rtt),
            ..stats(3, 3)
        };
        assert_eq!(
            "3 packets transmitted, 3 received, 0% packet loss, time 9012ms\n\
             rtt min/avg/max = 0.500/1.500/2.500 ms",
            statistics.to_string()
        );
    }

    #[test]
    fn test_rtt_summary_empty() {
        let rtt = RttSummary::default();
        assert_eq!(0, rtt.count());
        assert_eq!(Duration::ZERO, rtt.avg());
    }
}
