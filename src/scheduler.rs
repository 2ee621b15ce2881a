//! One ping at a time, paced to a fixed interval.
//!
//! [`PingScheduler::run_cycle`] performs a single probe and measures how long
//! it took. The caller turns that into the delay before the next cycle with
//! [`pacing_delay`], and [`PingScheduler::spawn_cycle`] runs the delayed cycle
//! on its own task so the event loop is never blocked by the wait. A cycle
//! still waiting when its epoch stops being live never sends its probe.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::debug;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::PingError;
use crate::ping::PingOutcome;
use crate::ping_executor::Prober;
use crate::session::Event;

/// Minimum spacing between the starts of two consecutive cycles.
pub const PING_INTERVAL: Duration = Duration::from_millis(500);

/// How long a single probe waits for its reply.
pub const PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Cheap plausibility check on a host string.
///
/// Full resolution is left to the prober, which may still reject it.
pub fn is_valid_input(target: &str) -> bool {
    target.contains('.') && !target.chars().any(char::is_whitespace)
}

/// Remaining interval budget after a cycle that took `elapsed`.
pub fn pacing_delay(elapsed: Duration) -> Duration {
    PING_INTERVAL.saturating_sub(elapsed)
}

pub struct PingScheduler<P> {
    prober: P,
    timeout: Duration,
}

impl<P: Prober> PingScheduler<P> {
    pub fn new(prober: P) -> Self {
        Self {
            prober,
            timeout: PING_TIMEOUT,
        }
    }

    /// Validate `target`, send one probe, and time the round trip.
    pub async fn run_cycle(&self, target: &str) -> Result<PingOutcome, PingError> {
        if !is_valid_input(target) {
            return Err(PingError::InvalidTarget(target.to_string()));
        }

        let timestamp = Local::now();
        let started_at = Instant::now();
        let report = self.prober.probe(target, self.timeout).await?;

        let outcome = if report.is_received() {
            PingOutcome::success(report.rtt, timestamp, started_at)
        } else {
            PingOutcome::failure(timestamp, started_at)
        };
        debug!(
            "cycle to {target} finished in {:?}: {}",
            outcome.elapsed, outcome.rtt
        );
        Ok(outcome)
    }

    /// Wait `delay`, run one cycle, and post the result tagged with `epoch`.
    ///
    /// `live` carries the epoch the session is currently pinging under. If it
    /// moves away from `epoch` before the wait is over, the cycle ends without
    /// probing. A closed channel means the session is gone; the result is
    /// dropped.
    pub fn spawn_cycle(
        self: &Arc<Self>,
        target: String,
        epoch: u64,
        delay: Duration,
        mut live: watch::Receiver<Option<u64>>,
        tx: UnboundedSender<Event>,
    ) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = live.wait_for(|current| *current != Some(epoch)) => {}
                }
            }
            if *live.borrow() != Some(epoch) {
                debug!("cycle for epoch {epoch} cancelled before probing {target}");
                return;
            }
            let event = match scheduler.run_cycle(&target).await {
                Ok(outcome) => Event::PingOutcome { epoch, outcome },
                Err(error) => Event::PingFailed { epoch, error },
            };
            let _ = tx.send(event);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ping::{ProbeReport, Sample};

    struct FixedProber {
        latency: Duration,
        report: Result<ProbeReport, ()>,
    }

    impl Prober for FixedProber {
        async fn probe(&self, target: &str, _timeout: Duration) -> Result<ProbeReport, PingError> {
            tokio::time::sleep(self.latency).await;
            self.report.map_err(|()| PingError::Send {
                target: target.to_string(),
                reason: "network is down".to_string(),
            })
        }
    }

    fn scheduler(latency_ms: u64, report: Result<ProbeReport, ()>) -> PingScheduler<FixedProber> {
        PingScheduler::new(FixedProber {
            latency: Duration::from_millis(latency_ms),
            report,
        })
    }

    #[test]
    fn input_validation() {
        assert!(is_valid_input("google.ca"));
        assert!(is_valid_input("127.0.0.1"));
        assert!(!is_valid_input("google .ca"));
        assert!(!is_valid_input("google.ca\t"));
        assert!(!is_valid_input(""));
        assert!(!is_valid_input("googleca"));
    }

    #[test]
    fn pacing_never_goes_negative() {
        assert_eq!(pacing_delay(Duration::from_millis(120)), Duration::from_millis(380));
        assert_eq!(pacing_delay(PING_INTERVAL), Duration::ZERO);
        assert_eq!(pacing_delay(Duration::from_secs(3)), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn received_packet_is_a_success() {
        let sched = scheduler(42, Ok(ProbeReport::received(Duration::from_millis(42))));
        let outcome = sched.run_cycle("example.com").await.unwrap();
        assert_eq!(outcome.rtt, Sample::Reply(Duration::from_millis(42)));
        assert!(outcome.elapsed >= Duration::from_millis(42));
        assert!(outcome.elapsed < Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn lost_packet_is_a_failed_sample_not_an_error() {
        let sched = scheduler(1_000, Ok(ProbeReport::lost()));
        let outcome = sched.run_cycle("example.com").await.unwrap();
        assert_eq!(outcome.rtt, Sample::Failed);
        assert_eq!(pacing_delay(outcome.elapsed), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_is_an_error() {
        let sched = scheduler(5, Err(()));
        let err = sched.run_cycle("example.com").await.unwrap_err();
        assert!(matches!(err, PingError::Send { .. }));
    }

    #[tokio::test]
    async fn implausible_target_never_reaches_the_prober() {
        let sched = scheduler(0, Err(()));
        let err = sched.run_cycle("not a host").await.unwrap_err();
        assert!(matches!(err, PingError::InvalidTarget(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_cycle_waits_out_the_delay() {
        let sched = Arc::new(scheduler(10, Ok(ProbeReport::received(Duration::from_millis(10)))));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let (_live_tx, live) = watch::channel(Some(7));

        let issued = Instant::now();
        sched.spawn_cycle("example.com".into(), 7, Duration::from_millis(490), live, tx);

        match rx.recv().await.unwrap() {
            Event::PingOutcome { epoch, outcome } => {
                assert_eq!(epoch, 7);
                assert!(outcome.started_at - issued >= Duration::from_millis(490));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn epoch_change_during_the_wait_cancels_the_cycle() {
        let sched = Arc::new(scheduler(10, Ok(ProbeReport::received(Duration::from_millis(10)))));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let (live_tx, live) = watch::channel(Some(3));

        let handle = sched.spawn_cycle("example.com".into(), 3, Duration::from_millis(490), live, tx);
        tokio::time::sleep(Duration::from_millis(100)).await;
        live_tx.send_replace(None);

        handle.await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stale_epoch_skips_the_network() {
        let sched = Arc::new(scheduler(0, Err(())));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let (_live_tx, live) = watch::channel(Some(5));

        sched.spawn_cycle("example.com".into(), 4, Duration::ZERO, live, tx).await.unwrap();
        assert!(rx.recv().await.is_none());
    }
}
