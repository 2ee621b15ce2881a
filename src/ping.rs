use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::Instant;

/// Text used for a failed sample wherever a duration would be printed.
pub const FAILED_RTT_TEXT: &str = "-1ms";

/// One point on the RTT chart.
///
/// `Failed` stands in for a probe that never came back. Keeping it as its own
/// variant means a real RTT, which is always non-negative, can never be
/// mistaken for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Reply(Duration),
    Failed,
}

impl Sample {
    pub fn rtt(self) -> Option<Duration> {
        match self {
            Sample::Reply(rtt) => Some(rtt),
            Sample::Failed => None,
        }
    }

    pub fn is_failed(self) -> bool {
        matches!(self, Sample::Failed)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sample::Reply(rtt) => write!(f, "{rtt:?}"),
            Sample::Failed => f.write_str(FAILED_RTT_TEXT),
        }
    }
}

/// What the network prober reports for a single echo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub packets_received: u8,
    pub rtt: Duration,
}

impl ProbeReport {
    pub fn received(rtt: Duration) -> Self {
        Self {
            packets_received: 1,
            rtt,
        }
    }

    pub fn lost() -> Self {
        Self {
            packets_received: 0,
            rtt: Duration::ZERO,
        }
    }

    pub fn is_received(&self) -> bool {
        self.packets_received == 1
    }
}

/// Result of one completed ping cycle, success or reachability failure.
#[derive(Debug, Clone, PartialEq)]
pub struct PingOutcome {
    pub rtt: Sample,
    pub timestamp: DateTime<Local>,
    pub started_at: Instant,
    /// Wall time the whole cycle took, used for pacing.
    pub elapsed: Duration,
}

impl PingOutcome {
    pub fn success(rtt: Duration, timestamp: DateTime<Local>, started_at: Instant) -> Self {
        Self::finish(Sample::Reply(rtt), timestamp, started_at)
    }

    pub fn failure(timestamp: DateTime<Local>, started_at: Instant) -> Self {
        Self::finish(Sample::Failed, timestamp, started_at)
    }

    fn finish(rtt: Sample, timestamp: DateTime<Local>, started_at: Instant) -> Self {
        Self {
            rtt,
            timestamp,
            started_at,
            elapsed: started_at.elapsed(),
        }
    }
}
