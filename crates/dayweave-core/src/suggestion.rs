//! Suggestion assembly.
//!
//! A suggestion is an ephemeral, derived candidate: one per eligible memo
//! per scheduling pass, never persisted. The builder combines the need
//! calculator, the duration predictor and the discrete importance mapping,
//! and applies the visibility threshold. Memos settled for the day
//! (accepted or rejected) produce no suggestion at all; an accepted memo's
//! committed slot is surfaced through its state record instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::memo::{LocationPreference, Memo, MemoKind, MemoState};
use crate::need::NeedCalculator;
use crate::predictor::DurationPredictor;

/// A scored candidate for filling a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Identity for this pass only.
    pub id: String,
    pub memo_id: String,
    /// Urgency; >= 1.0 is mandatory, < 0.5 is hidden.
    pub need: f64,
    /// Discrete importance score (0.0 / 0.2 / 0.4).
    pub importance: f64,
    /// Ideal session minutes for today.
    pub duration_minutes: u32,
    /// Floor below which the session cannot be shrunk.
    pub base_minutes: u32,
    pub kind: MemoKind,
    pub location: LocationPreference,
    /// Computed but excluded from user-facing lists.
    pub is_hidden: bool,
}

impl Suggestion {
    /// Whether this candidate must be placed before any optional one.
    pub fn is_mandatory(&self, config: &EngineConfig) -> bool {
        self.need >= config.mandatory_threshold
    }
}

/// Builds suggestions from memos for one scheduling pass.
pub struct SuggestionBuilder {
    config: EngineConfig,
    needs: NeedCalculator,
    predictor: DurationPredictor,
}

impl SuggestionBuilder {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            needs: NeedCalculator::with_config(config.clone()),
            predictor: DurationPredictor::with_config(config.clone()),
            config,
        }
    }

    /// Build the suggestion for a single memo, if it is eligible.
    ///
    /// Assumes the period tracker already rolled the memo to `now`.
    /// Returns `None` for memos settled for the day, memos with zero need,
    /// and memos failing the integrity check (logged, not fatal).
    pub fn build(&self, memo: &Memo, now: DateTime<Utc>) -> Option<Suggestion> {
        if let Err(fault) = memo.integrity() {
            warn!(memo_id = %memo.id, %fault, "excluding memo from scoring");
            return None;
        }

        let today = now.date_naive();
        if memo.rejected_today() || memo.accepted_on(today) {
            return None;
        }

        let need = self.needs.need(memo, now);
        if need <= 0.0 {
            return None;
        }

        let (duration, base) = self.session_durations(memo, now);

        Some(Suggestion {
            id: uuid::Uuid::new_v4().to_string(),
            memo_id: memo.id.clone(),
            need,
            importance: memo.importance.score(),
            duration_minutes: duration,
            base_minutes: base,
            kind: memo.kind,
            location: memo.location,
            is_hidden: need < self.config.hidden_threshold,
        })
    }

    /// Build suggestions for a whole pass. One faulty memo never prevents
    /// scoring the rest.
    pub fn build_all(&self, memos: &[Memo], now: DateTime<Utc>) -> Vec<Suggestion> {
        memos.iter().filter_map(|m| self.build(m, now)).collect()
    }

    /// Ideal and floor minutes for today's session.
    ///
    /// Deadline memos go through the predictor; routine and backlog reuse
    /// the last accepted duration with the user's estimate as the floor.
    fn session_durations(&self, memo: &Memo, now: DateTime<Utc>) -> (u32, u32) {
        match &memo.state {
            MemoState::Deadline(state) => {
                let base = memo.session_minutes.max(1);
                let duration = self
                    .predictor
                    .predicted_minutes(state, base, now.date_naive());
                (duration, base)
            }
            MemoState::Routine(state) => {
                let duration = state
                    .last_accepted_duration
                    .unwrap_or(memo.session_minutes)
                    .max(1);
                (duration, memo.session_minutes.max(1).min(duration))
            }
            MemoState::Backlog(state) => {
                let duration = state
                    .last_accepted_duration
                    .unwrap_or(memo.session_minutes)
                    .max(1);
                (duration, memo.session_minutes.max(1).min(duration))
            }
        }
    }
}

impl Default for SuggestionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
