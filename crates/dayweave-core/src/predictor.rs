//! Adaptive session-duration prediction for deadline memos.
//!
//! Each deadline memo carries a pre-seeded expected-duration curve rising
//! from the user's ideal session length on day 0 to five times that length
//! on the final day. Completed sessions accumulate into the actual-duration
//! array, and an exponentially smoothed multiplier tracks how the user's
//! real sessions compare to the curve. The prediction for "today" is the
//! curve value scaled by the multiplier, floored at the user's original
//! estimate: deadline sessions are only ever extended, never shrunk below
//! what the user asked for.
//!
//! Routine and backlog memos skip all of this and reuse the last accepted
//! duration directly.

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::memo::DeadlineState;

/// Duration predictor over an engine configuration.
pub struct DurationPredictor {
    config: EngineConfig,
}

impl DurationPredictor {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Record a completed session of `minutes` on `day` and re-smooth the
    /// multiplier toward today's actual-to-expected ratio.
    ///
    /// Saves the pre-update multiplier and the logged minutes so the most
    /// recent completion can be undone.
    pub fn record_completion(&self, state: &mut DeadlineState, day: NaiveDate, minutes: u32) {
        let offset = state.offset_of(day);
        state.previous_smoothed_multiplier = state.smoothed_multiplier;
        state.last_logged_minutes = Some(minutes);
        state.actual_minutes[offset] = state.actual_minutes[offset].saturating_add(minutes);

        let expected = state.expected_minutes[offset].max(1) as f64;
        let ratio = state.actual_minutes[offset] as f64 / expected;
        let alpha = self.config.smoothing_alpha.clamp(0.0, 1.0);
        let smoothed = alpha * ratio + (1.0 - alpha) * state.smoothed_multiplier;
        state.smoothed_multiplier =
            smoothed.clamp(self.config.multiplier_min, self.config.multiplier_max);
    }

    /// Reverse the most recent [`record_completion`](Self::record_completion).
    ///
    /// No-op when there is nothing logged to reverse.
    pub fn undo_completion(&self, state: &mut DeadlineState, day: NaiveDate) {
        let Some(minutes) = state.last_logged_minutes.take() else {
            return;
        };
        let offset = state.offset_of(day);
        state.actual_minutes[offset] = state.actual_minutes[offset].saturating_sub(minutes);
        state.smoothed_multiplier = state.previous_smoothed_multiplier;
    }

    /// Predicted session minutes for `today`.
    ///
    /// `base` is the user's original session estimate and acts as the
    /// floor; it is also the shrink floor the allocator may fall back to.
    pub fn predicted_minutes(&self, state: &DeadlineState, base: u32, today: NaiveDate) -> u32 {
        let offset = state.offset_of(today);
        let raw = state.expected_minutes[offset] as f64 * state.smoothed_multiplier;
        (raw.round() as u32).max(base)
    }
}

impl Default for DurationPredictor {
    fn default() -> Self {
        Self::new()
    }
}
