//! Fixed-timestep scheduler.
//!
//! Accumulates host frame time and reports how many whole simulation ticks are
//! due. Backlog beyond [`MAX_TICKS_PER_UPDATE`] is dropped so a stalled host
//! cannot trigger a catch-up spiral.

use bitfit_core::constants::{FRAME_MS, MAX_TICKS_PER_UPDATE};

/// Result of one scheduler update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub ticks: u32,
    /// Fraction of a tick left in the accumulator, in [0, 1).
    pub alpha: f64,
}

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    accumulator_ms: f64,
    step_ms: f64,
    max_ticks: u32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(FRAME_MS, MAX_TICKS_PER_UPDATE)
    }
}

impl FixedTimestep {
    pub fn new(step_ms: f64, max_ticks: u32) -> Self {
        Self {
            accumulator_ms: 0.0,
            step_ms,
            max_ticks: max_ticks.max(1),
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }

    /// Feed elapsed host time. Negative or non-finite deltas count as zero.
    pub fn update(&mut self, delta_ms: f64) -> StepResult {
        let delta = if delta_ms.is_finite() && delta_ms > 0.0 {
            delta_ms
        } else {
            0.0
        };
        self.accumulator_ms += delta;

        let mut ticks = 0;
        while self.accumulator_ms >= self.step_ms && ticks < self.max_ticks {
            self.accumulator_ms -= self.step_ms;
            ticks += 1;
        }
        if self.accumulator_ms >= self.step_ms {
            tracing::debug!(
                dropped_ms = self.accumulator_ms - self.accumulator_ms % self.step_ms,
                "scheduler dropped backlog"
            );
            self.accumulator_ms %= self.step_ms;
        }
        if self.accumulator_ms < 0.0 {
            self.accumulator_ms = 0.0;
        }

        let alpha = (self.accumulator_ms / self.step_ms).clamp(0.0, 1.0 - f64::EPSILON);
        StepResult { ticks, alpha }
    }
}
