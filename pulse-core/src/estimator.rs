//! # Tap-Rate Estimator
//!
//! Records tap timestamps and derives a running beats-per-minute estimate
//! from the average of all consecutive inter-tap intervals of the current
//! session. A session ends when the idle timeout elapses with no further
//! taps; the pending timeout is identified by an [`IdleToken`] so that a
//! stale delivery can never act on a newer session.

use std::time::{Duration, Instant};

use log::debug;

/// Tuning knobs for the estimator and the end-of-session flash.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Time since the last tap after which the session is considered done.
    pub idle_threshold: Duration,
    /// Taps closer together than this are ignored as accidental double
    /// fires. Also keeps every recorded interval strictly positive.
    pub debounce: Duration,
    /// Number of display toggles in the end-of-session flash.
    pub flash_toggles: u32,
    /// Delay between flash toggles.
    pub flash_interval: Duration,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            idle_threshold: Duration::from_secs(2),
            debounce: Duration::from_millis(100),
            flash_toggles: 4,
            flash_interval: Duration::from_millis(250),
        }
    }
}

/// Identifies the currently armed idle timeout.
///
/// Every accepted tap invalidates the previous token and issues a new one.
/// The display layer hands the token back when its deferred timeout fires;
/// a token from an earlier tap (or an earlier session) is simply ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleToken(u64);

/// Result of feeding one tap into the estimator.
#[derive(Debug, Clone, Copy)]
pub struct TapOutcome {
    /// False when the tap fell inside the debounce window and was dropped.
    pub accepted: bool,
    /// The estimate after this tap, if the session has at least two taps.
    pub estimate: Option<u32>,
    /// Token for the idle timeout that should now be armed. Unchanged when
    /// the tap was not accepted.
    pub idle_token: IdleToken,
}

/// Summary handed to the display layer when a session ends.
#[derive(Debug, Clone, Copy)]
pub struct SessionEnd {
    /// The final estimate, if the session ever produced one.
    pub final_bpm: Option<u32>,
    /// How many taps the ended session recorded.
    pub tap_count: usize,
}

/// Pure read of the estimator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub bpm: Option<u32>,
    pub tap_count: usize,
    pub measuring: bool,
}

/// The tap session state machine: Idle until the first tap, Measuring while
/// taps keep arriving, back to Idle when [`TapEstimator::idle_elapsed`]
/// fires with the current token.
#[derive(Debug)]
pub struct TapEstimator {
    config: EstimatorConfig,
    taps: Vec<Instant>,
    estimate: Option<u32>,
    generation: u64,
}

impl TapEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            taps: Vec::new(),
            estimate: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Records a tap at `now`.
    ///
    /// A tap within the debounce window of the previous one is dropped
    /// entirely: no timestamp is stored, the estimate does not move, and
    /// the idle timeout is not rearmed. Otherwise the timestamp joins the
    /// session, the previous idle token is invalidated, and the estimate
    /// is recomputed over the whole tap history.
    pub fn tap(&mut self, now: Instant) -> TapOutcome {
        if let Some(&last) = self.taps.last() {
            if now.saturating_duration_since(last) < self.config.debounce {
                debug!("tap dropped by debounce window");
                return TapOutcome {
                    accepted: false,
                    estimate: self.estimate,
                    idle_token: IdleToken(self.generation),
                };
            }
        }

        self.taps.push(now);
        self.generation += 1;
        self.estimate = bpm_over(&self.taps);

        TapOutcome {
            accepted: true,
            estimate: self.estimate,
            idle_token: IdleToken(self.generation),
        }
    }

    /// Delivery point for the deferred idle timeout.
    ///
    /// Returns `None` when `token` is stale (a newer tap rearmed the
    /// timeout, or the session already ended) or when nothing was being
    /// measured. With the current token it clears the tap history, ends
    /// the session, and hands back the final estimate exactly once.
    pub fn idle_elapsed(&mut self, token: IdleToken) -> Option<SessionEnd> {
        if token.0 != self.generation || self.taps.is_empty() {
            return None;
        }

        let ended = SessionEnd {
            final_bpm: self.estimate.take(),
            tap_count: self.taps.len(),
        };
        self.taps.clear();
        // The session is gone; a second delivery of the same token must
        // not end anything again.
        self.generation += 1;

        debug!(
            "session ended after {} taps, final estimate {:?}",
            ended.tap_count, ended.final_bpm
        );
        Some(ended)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bpm: self.estimate,
            tap_count: self.taps.len(),
            measuring: !self.taps.is_empty(),
        }
    }
}

/// BPM from the arithmetic mean of all consecutive tap intervals.
///
/// Needs at least two taps. The mean interval is guarded against a
/// non-positive value even though the debounce rule already keeps every
/// recorded interval above zero.
fn bpm_over(taps: &[Instant]) -> Option<u32> {
    if taps.len() < 2 {
        return None;
    }

    let total: Duration = taps
        .windows(2)
        .map(|pair| pair[1].saturating_duration_since(pair[0]))
        .sum();
    let mean = total.as_secs_f64() / (taps.len() - 1) as f64;

    if mean <= 0.0 {
        return None;
    }
    Some((60.0 / mean).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, secs: f64) -> Instant {
        base + Duration::from_secs_f64(secs)
    }

    fn estimator() -> (TapEstimator, Instant) {
        (TapEstimator::new(EstimatorConfig::default()), Instant::now())
    }

    #[test]
    fn single_tap_has_no_estimate() {
        let (mut est, base) = estimator();
        let outcome = est.tap(base);
        assert!(outcome.accepted);
        assert_eq!(outcome.estimate, None);
        assert_eq!(est.snapshot().tap_count, 1);
    }

    #[test]
    fn steady_taps_at_600ms_read_100_bpm() {
        let (mut est, base) = estimator();
        est.tap(at(base, 0.0));
        est.tap(at(base, 0.6));
        let outcome = est.tap(at(base, 1.2));
        assert_eq!(outcome.estimate, Some(100));
    }

    #[test]
    fn average_covers_the_whole_session() {
        let (mut est, base) = estimator();
        est.tap(at(base, 0.0));
        est.tap(at(base, 0.5));
        // Intervals 0.5 and 1.0, mean 0.75, so 80 BPM rather than the
        // 60 BPM the last pair alone would give.
        let outcome = est.tap(at(base, 1.5));
        assert_eq!(outcome.estimate, Some(80));
    }

    #[test]
    fn estimate_rounds_to_nearest_integer() {
        let (mut est, base) = estimator();
        est.tap(at(base, 0.0));
        // 60 / 0.7 = 85.71...
        let outcome = est.tap(at(base, 0.7));
        assert_eq!(outcome.estimate, Some(86));
    }

    #[test]
    fn rapid_double_fire_is_dropped() {
        let (mut est, base) = estimator();
        let first = est.tap(at(base, 0.0));
        let second = est.tap(at(base, 0.05));
        assert!(!second.accepted);
        assert_eq!(second.idle_token, first.idle_token);
        assert_eq!(est.snapshot().tap_count, 1);
        assert_eq!(second.estimate, None);
    }

    #[test]
    fn stale_token_does_not_end_the_session() {
        let (mut est, base) = estimator();
        let first = est.tap(at(base, 0.0));
        let second = est.tap(at(base, 0.6));

        assert!(est.idle_elapsed(first.idle_token).is_none());
        assert!(est.snapshot().measuring);

        let ended = est.idle_elapsed(second.idle_token).expect("current token");
        assert_eq!(ended.final_bpm, Some(100));
        assert_eq!(ended.tap_count, 2);
    }

    #[test]
    fn timeout_clears_the_session_and_fires_once() {
        let (mut est, base) = estimator();
        est.tap(at(base, 0.0));
        let outcome = est.tap(at(base, 0.6));

        assert!(est.idle_elapsed(outcome.idle_token).is_some());

        let after = est.snapshot();
        assert_eq!(after.bpm, None);
        assert_eq!(after.tap_count, 0);
        assert!(!after.measuring);

        // Same token again is stale by now.
        assert!(est.idle_elapsed(outcome.idle_token).is_none());
    }

    #[test]
    fn timeout_after_a_lone_tap_yields_no_estimate() {
        let (mut est, base) = estimator();
        let outcome = est.tap(at(base, 0.0));
        let ended = est.idle_elapsed(outcome.idle_token).expect("current token");
        assert_eq!(ended.final_bpm, None);
        assert_eq!(ended.tap_count, 1);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let (mut est, base) = estimator();
        est.tap(at(base, 0.0));
        est.tap(at(base, 0.6));
        est.tap(at(base, 1.2));
        assert_eq!(est.snapshot(), est.snapshot());
        assert_eq!(est.snapshot().bpm, Some(100));
    }

    #[test]
    fn next_session_starts_clean() {
        let (mut est, base) = estimator();
        est.tap(at(base, 0.0));
        let outcome = est.tap(at(base, 0.6));
        est.idle_elapsed(outcome.idle_token);

        // A fresh session at a different cadence is unaffected by the
        // previous one.
        est.tap(at(base, 10.0));
        let outcome = est.tap(at(base, 11.0));
        assert_eq!(outcome.estimate, Some(60));
    }
}
