//! Engine facade: the scheduling pipeline over a memo store.
//!
//! One scheduling pass is a pure pipeline over an immutable snapshot:
//! period rollover, then need calculation and duration prediction per
//! memo, then suggestion assembly, then gap allocation. Nothing blocks on
//! I/O mid-pass and a single memo failing never prevents scoring the rest.
//!
//! Reactions are applied one memo at a time; a reaction addressed to a
//! memo that no longer exists is a silent no-op outcome, since the user
//! may delete a task while a completion is still in flight.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocator::{AllocationResult, Gap, GapAllocator};
use crate::config::EngineConfig;
use crate::enrich::{create_memo, MemoDraft, MemoEnricher};
use crate::error::{EngineError, Result};
use crate::memo::Memo;
use crate::period;
use crate::reaction::{Reaction, ReactionHandler};
use crate::storage::MemoStore;
use crate::suggestion::{Suggestion, SuggestionBuilder};

/// Calendar collaborator: supplies the day's ordered, non-overlapping
/// free-time gaps.
pub trait GapProvider {
    fn gaps_for_day(&self, day: NaiveDate) -> Result<Vec<Gap>>;
}

/// Outcome of a reaction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionOutcome {
    /// The reaction was applied and persisted.
    Applied,
    /// The memo does not exist (e.g. deleted while the reaction was in
    /// flight); nothing happened.
    Ignored,
}

/// Suggestions plus their allocation for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    /// Visible suggestions, in allocation priority order as produced.
    pub suggestions: Vec<Suggestion>,
    pub allocation: AllocationResult,
}

/// The suggestion engine over a memo store.
pub struct SuggestionEngine<S: MemoStore> {
    store: S,
    config: EngineConfig,
    builder: SuggestionBuilder,
    allocator: GapAllocator,
    reactions: ReactionHandler,
}

impl<S: MemoStore> SuggestionEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            builder: SuggestionBuilder::with_config(config.clone()),
            allocator: GapAllocator::with_config(config.clone()),
            reactions: ReactionHandler::with_config(config.clone()),
            config,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a memo from a draft, enriching missing fields, and persist it.
    pub fn create_memo<E: MemoEnricher>(
        &mut self,
        draft: MemoDraft,
        enricher: &E,
        now: DateTime<Utc>,
    ) -> Result<Memo> {
        let memo = create_memo(draft, enricher, now);
        self.store.upsert(&memo)?;
        Ok(memo)
    }

    /// Compute the visible suggestions for `now`.
    ///
    /// Runs the lazy period tracker over every memo first and persists any
    /// rolled-over state, so bookkeeping stays correct even when nothing
    /// is shown.
    pub fn compute_suggestions(&mut self, now: DateTime<Utc>) -> Result<Vec<Suggestion>> {
        let suggestions = self.score_all(now)?;
        Ok(suggestions.into_iter().filter(|s| !s.is_hidden).collect())
    }

    /// Compute suggestions and allocate them into the supplied gaps.
    pub fn plan_day(&mut self, now: DateTime<Utc>, gaps: &[Gap]) -> Result<DayPlan> {
        let suggestions: Vec<Suggestion> = self
            .score_all(now)?
            .into_iter()
            .filter(|s| !s.is_hidden)
            .collect();
        let allocation = self.allocator.allocate(&suggestions, gaps);
        Ok(DayPlan {
            suggestions,
            allocation,
        })
    }

    /// Like [`plan_day`](Self::plan_day), fetching gaps from the calendar
    /// collaborator.
    pub fn plan_day_from<P: GapProvider>(
        &mut self,
        now: DateTime<Utc>,
        provider: &P,
    ) -> Result<DayPlan> {
        let gaps = provider.gaps_for_day(now.date_naive())?;
        self.plan_day(now, &gaps)
    }

    /// Allocate externally prepared suggestions; pure, no store access.
    pub fn allocate(&self, suggestions: &[Suggestion], gaps: &[Gap]) -> AllocationResult {
        self.allocator.allocate(suggestions, gaps)
    }

    /// Apply a user reaction to a memo and persist the result.
    ///
    /// A missing memo is a no-op outcome, not an error. An invalid
    /// reaction (undo after rollover, accept after reject) is returned to
    /// the caller and the stored state is untouched.
    pub fn react(
        &mut self,
        memo_id: &str,
        reaction: Reaction,
        now: DateTime<Utc>,
    ) -> Result<ReactionOutcome> {
        let Some(mut memo) = self.store.get(memo_id)? else {
            debug!(memo_id, "reaction for unknown memo ignored");
            return Ok(ReactionOutcome::Ignored);
        };
        self.reactions
            .apply(&mut memo, reaction, now)
            .map_err(EngineError::from)?;
        self.store.upsert(&memo)?;
        Ok(ReactionOutcome::Applied)
    }

    /// Force rollover across all stored memos.
    ///
    /// Invoked once daily by the external scheduler, independent of the
    /// per-memo lazy triggering. Returns how many memos changed.
    pub fn on_day_boundary(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let today = now.date_naive();
        let mut rolled = 0;
        for mut memo in self.store.list()? {
            if period::roll_over(&mut memo, today) {
                self.store.upsert(&memo)?;
                rolled += 1;
            }
        }
        debug!(rolled, %today, "day boundary rollover");
        Ok(rolled)
    }

    /// Roll over, score and return every suggestion including hidden ones.
    fn score_all(&mut self, now: DateTime<Utc>) -> Result<Vec<Suggestion>> {
        let today = now.date_naive();
        let mut memos = self.store.list()?;
        for memo in &mut memos {
            if period::roll_over(memo, today) {
                self.store.upsert(memo)?;
            }
        }
        Ok(self.builder.build_all(&memos, now))
    }
}
