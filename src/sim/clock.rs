//! Frame clock
//!
//! Converts variable frame deltas into whole fixed-period ticks, and provides
//! the tick-driven countdowns the games show on screen.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};

/// Fixed-period tick accumulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedStep {
    period_ms: f64,
    accumulator: f64,
}

impl FixedStep {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Feed elapsed wall time, returning how many ticks are due.
    ///
    /// Long gaps are clamped and ticks per call are capped; whatever is left
    /// over carries into the next frame. Backlog beyond `MAX_SUBSTEPS` ticks
    /// is dropped, not replayed as a larger step.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed_ms.min(MAX_FRAME_MS);

        let mut ticks = 0;
        while self.accumulator >= self.period_ms && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.period_ms;
            ticks += 1;
        }
        // Drop the backlog we refused to simulate
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.period_ms);
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Visible countdown driven by tick deltas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ms: f64,
    /// Sub-second remainder not yet reported as a whole second
    pending_ms: f64,
}

impl Countdown {
    pub fn from_secs(secs: u32) -> Self {
        Self {
            remaining_ms: secs as f64 * 1000.0,
            pending_ms: 0.0,
        }
    }

    /// Advance by `dt_ms`, returning how many whole seconds elapsed
    pub fn tick(&mut self, dt_ms: f64) -> u32 {
        if self.is_expired() || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        let dt = dt_ms.min(self.remaining_ms);
        self.remaining_ms -= dt;
        self.pending_ms += dt;

        let whole = (self.pending_ms / 1000.0).floor();
        self.pending_ms -= whole * 1000.0;
        whole as u32
    }

    /// Whole seconds left, rounded up (what the HUD shows)
    pub fn seconds_left(&self) -> u32 {
        (self.remaining_ms / 1000.0).ceil() as u32
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }
}

/// A one-shot delay measured in ticks of known length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    remaining_ms: f64,
}

impl Delay {
    pub fn new(ms: f64) -> Self {
        Self { remaining_ms: ms }
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms.max(0.0)
    }

    /// Returns true on the tick the delay runs out. Non-finite or negative
    /// deltas are ignored.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        if self.remaining_ms <= 0.0 || !dt_ms.is_finite() || dt_ms < 0.0 {
            return false;
        }
        self.remaining_ms -= dt_ms;
        self.remaining_ms <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_carries_remainder() {
        let mut step = FixedStep::new(40.0);
        assert_eq!(step.advance(30.0), 0);
        assert_eq!(step.advance(30.0), 1);
        assert_eq!(step.advance(20.0), 1);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut step = FixedStep::new(1.0);
        assert_eq!(step.advance(1000.0), MAX_SUBSTEPS);
        // Backlog is discarded rather than replayed
        assert!(step.advance(0.5) <= 1);
    }

    #[test]
    fn test_fixed_step_ignores_bad_deltas() {
        let mut step = FixedStep::new(16.0);
        assert_eq!(step.advance(-5.0), 0);
        assert_eq!(step.advance(f64::NAN), 0);
    }

    #[test]
    fn test_countdown_reports_whole_seconds() {
        let mut countdown = Countdown::from_secs(2);
        assert_eq!(countdown.seconds_left(), 2);
        assert_eq!(countdown.tick(600.0), 0);
        assert_eq!(countdown.tick(600.0), 1);
        assert_eq!(countdown.seconds_left(), 1);
        assert_eq!(countdown.tick(5000.0), 1);
        assert!(countdown.is_expired());
        assert_eq!(countdown.tick(1000.0), 0);
    }

    #[test]
    fn test_delay_fires_once() {
        let mut delay = Delay::new(500.0);
        assert!(!delay.tick(250.0));
        assert!(delay.tick(250.0));
        assert!(!delay.tick(250.0));
    }

    #[test]
    fn test_delay_survives_bad_deltas() {
        let mut delay = Delay::new(500.0);
        assert!(!delay.tick(f64::NAN));
        assert!(!delay.tick(f64::INFINITY));
        assert!(!delay.tick(-100.0));
        assert_eq!(delay.remaining_ms(), 500.0);
        assert!(delay.tick(500.0));

        let mut countdown = Countdown::from_secs(2);
        assert_eq!(countdown.tick(f64::NAN), 0);
        assert_eq!(countdown.seconds_left(), 2);
        assert_eq!(countdown.tick(1000.0), 1);
    }
}
