//! Cancellable fixed-period clocks
//!
//! A `RepeatingTask` converts elapsed time into whole ticks. Callers feed it
//! wall time (browser) or virtual time (tests, headless harness), so nothing
//! here ever sleeps or registers a callback.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::consts::MAX_CATCHUP_TICKS;

/// Lifecycle of a clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    /// Firing ticks as time advances
    Running,
    /// Stopped by the user; can resume
    Paused,
    /// Torn down with its view; never fires again
    Cancelled,
}

/// A fixed-period repeating task driven by elapsed time.
///
/// There is no catch-up: a late frame fires at most `max_catchup` ticks and
/// the remaining time is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeatingTask {
    period_ms: u32,
    /// Time banked toward the next tick
    pending_ms: f64,
    state: ClockState,
    max_catchup: u32,
    ticks_fired: u64,
}

impl RepeatingTask {
    /// Create a running clock
    pub fn start(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            pending_ms: 0.0,
            state: ClockState::Running,
            max_catchup: MAX_CATCHUP_TICKS,
            ticks_fired: 0,
        }
    }

    /// Create a clock that waits for `resume`
    pub fn paused(period_ms: u32) -> Self {
        let mut task = Self::start(period_ms);
        task.state = ClockState::Paused;
        task
    }

    pub fn with_max_catchup(mut self, ticks: u32) -> Self {
        self.max_catchup = ticks.max(1);
        self
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Total ticks fired since creation
    pub fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    /// Stop firing. Banked time is discarded, so a resumed clock waits a full period.
    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
            self.pending_ms = 0.0;
        }
    }

    pub fn resume(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
        }
    }

    /// Flip between running and paused. Returns whether the clock now runs.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            ClockState::Running => self.pause(),
            ClockState::Paused => self.resume(),
            ClockState::Cancelled => {}
        }
        self.is_running()
    }

    /// Permanently stop the clock
    pub fn cancel(&mut self) {
        self.state = ClockState::Cancelled;
        self.pending_ms = 0.0;
    }

    /// Bank `elapsed_ms` and return how many ticks are due now
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        // Rejects NaN and infinities too
        if self.state != ClockState::Running || !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0;
        }

        let period = f64::from(self.period_ms);
        self.pending_ms += elapsed_ms;
        let due = (self.pending_ms / period).floor();
        if due < 1.0 {
            return 0;
        }

        let fired = if due > f64::from(self.max_catchup) {
            // Lost time: keep only the phase within the current period
            self.pending_ms %= period;
            self.max_catchup
        } else {
            self.pending_ms -= due * period;
            due as u32
        };

        self.ticks_fired += u64::from(fired);
        fired
    }
}

/// A view-owned simulation driven by elapsed time
pub trait Simulation {
    /// Advance by `elapsed_ms`, running every tick that falls due.
    /// Returns the number of ticks run.
    fn advance(&mut self, elapsed_ms: f64, rng: &mut dyn RandomSource) -> u32;

    /// Cancel every clock this simulation owns
    fn cancel(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_period() {
        let mut clock = RepeatingTask::start(50);
        assert_eq!(clock.advance(49.0), 0);
        assert_eq!(clock.advance(1.0), 1);
        assert_eq!(clock.advance(100.0), 2);
        assert_eq!(clock.ticks_fired(), 3);
    }

    #[test]
    fn test_partial_time_is_banked() {
        let mut clock = RepeatingTask::start(150);
        let fired: u32 = (0..10).map(|_| clock.advance(16.0)).sum();
        // 160 ms of 16 ms frames crosses one 150 ms boundary
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_no_catch_up_after_stall() {
        let mut clock = RepeatingTask::start(50).with_max_catchup(4);
        assert_eq!(clock.advance(10_000.0), 4);
        // Dropped time is not paid back later
        assert_eq!(clock.advance(10.0), 0);
    }

    #[test]
    fn test_pause_discards_banked_time() {
        let mut clock = RepeatingTask::start(100);
        clock.advance(90.0);
        clock.pause();
        assert_eq!(clock.advance(500.0), 0);
        clock.resume();
        assert_eq!(clock.advance(10.0), 0);
        assert_eq!(clock.advance(90.0), 1);
    }

    #[test]
    fn test_toggle() {
        let mut clock = RepeatingTask::start(100);
        assert!(!clock.toggle());
        assert_eq!(clock.state(), ClockState::Paused);
        assert!(clock.toggle());
        assert_eq!(clock.state(), ClockState::Running);
    }

    #[test]
    fn test_cancel_is_final() {
        let mut clock = RepeatingTask::start(100);
        clock.cancel();
        clock.resume();
        assert!(!clock.toggle());
        assert_eq!(clock.advance(1_000.0), 0);
        assert_eq!(clock.ticks_fired(), 0);
        assert_eq!(clock.state(), ClockState::Cancelled);
    }

    #[test]
    fn test_ignores_bad_elapsed() {
        let mut clock = RepeatingTask::start(100);
        assert_eq!(clock.advance(-50.0), 0);
        assert_eq!(clock.advance(f64::NAN), 0);
        assert_eq!(clock.advance(100.0), 1);
    }

    #[test]
    fn test_infinite_elapsed_does_not_poison_clock() {
        let mut clock = RepeatingTask::start(50);
        assert_eq!(clock.advance(f64::INFINITY), 0);
        assert_eq!(clock.advance(f64::NEG_INFINITY), 0);
        assert_eq!(clock.advance(50.0), 1);
        assert_eq!(clock.advance(100.0), 2);
    }

    #[test]
    fn test_paused_constructor_waits() {
        let mut clock = RepeatingTask::paused(100);
        assert_eq!(clock.advance(300.0), 0);
        clock.resume();
        assert_eq!(clock.advance(300.0), 3);
    }
}
