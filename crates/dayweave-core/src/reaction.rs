//! User reactions: accept, reject, complete, undo.
//!
//! Each reaction is a total function over the memo's state record: it
//! either applies fully or is rejected with an [`InvalidReaction`], never
//! leaving a partial state. Reactions are the only operations that touch
//! `last_activity`, which is what the period tracker keys rollover on.
//!
//! Undo is same-day only: it reverses the most recent accept or complete
//! while `last_activity` is still today; after a rollover it fails and the
//! caller reports that to the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::InvalidReaction;
use crate::memo::{AcceptedSlot, LastReaction, Memo, MemoState};
use crate::period;
use crate::predictor::DurationPredictor;

/// A user reaction to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Reaction {
    /// Commit to working the memo in the given slot.
    Accept { slot: AcceptedSlot },
    /// Dismiss the memo for the rest of the day.
    Reject,
    /// Log a finished session of `minutes`.
    Complete { minutes: u32 },
    /// Reverse the most recent accept/complete, same day only.
    Undo,
}

/// Applies reactions to memo state records.
pub struct ReactionHandler {
    predictor: DurationPredictor,
}

impl ReactionHandler {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            predictor: DurationPredictor::with_config(config),
        }
    }

    /// Apply a reaction to a memo at `now`.
    ///
    /// Rolls the memo forward first, so a reaction arriving after midnight
    /// lands on a clean day. On success `last_activity` is set to `now`.
    pub fn apply(
        &self,
        memo: &mut Memo,
        reaction: Reaction,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidReaction> {
        let today = now.date_naive();
        period::roll_over(memo, today);

        match reaction {
            Reaction::Accept { slot } => self.accept(memo, slot)?,
            Reaction::Reject => self.reject(memo, today),
            Reaction::Complete { minutes } => self.complete(memo, minutes, today),
            Reaction::Undo => self.undo(memo, now)?,
        }

        memo.last_activity = now;
        Ok(())
    }

    fn accept(&self, memo: &mut Memo, slot: AcceptedSlot) -> Result<(), InvalidReaction> {
        if memo.rejected_today() {
            return Err(InvalidReaction::AcceptAfterReject {
                memo_id: memo.id.clone(),
            });
        }
        match &mut memo.state {
            MemoState::Routine(state) => {
                if state.accepted_today {
                    return Err(InvalidReaction::AlreadyAccepted {
                        memo_id: memo.id.clone(),
                    });
                }
                state.accepted_today = true;
                state.accepted_slot = Some(slot);
                state.previous_last_completed_day = state.last_completed_day;
                state.last_reaction = Some(LastReaction::Accepted);
            }
            MemoState::Backlog(state) => {
                if state.accepted_today {
                    return Err(InvalidReaction::AlreadyAccepted {
                        memo_id: memo.id.clone(),
                    });
                }
                state.accepted_today = true;
                state.accepted_slot = Some(slot);
                state.previous_last_completed_day = state.last_completed_day;
                state.last_reaction = Some(LastReaction::Accepted);
            }
            MemoState::Deadline(state) => {
                // Deadline memos accrue sessions; several slots may be
                // committed before the deadline.
                state.accepted_slots.push(slot);
                state.previous_last_completed_day = state.last_completed_day;
                state.last_reaction = Some(LastReaction::Accepted);
            }
        }
        Ok(())
    }

    fn reject(&self, memo: &mut Memo, today: chrono::NaiveDate) {
        match &mut memo.state {
            MemoState::Routine(state) => {
                state.rejected_today = true;
                state.accepted_today = false;
                state.accepted_slot = None;
                state.last_reaction = None;
            }
            MemoState::Backlog(state) => {
                state.rejected_today = true;
                state.accepted_today = false;
                state.accepted_slot = None;
                state.last_reaction = None;
            }
            MemoState::Deadline(state) => {
                state.rejected_today = true;
                // Today's commitment is withdrawn; future sessions stand.
                state.accepted_slots.retain(|slot| slot.day != today);
                state.last_reaction = None;
            }
        }
    }

    fn complete(&self, memo: &mut Memo, minutes: u32, today: chrono::NaiveDate) {
        let goal_count = memo.recurrence_goal.map(|g| g.count).unwrap_or(0);
        match &mut memo.state {
            MemoState::Routine(state) => {
                state.previous_last_completed_day = state.last_completed_day;
                state.completed_count_this_period += 1;
                state.completed_today = true;
                state.last_completed_day = Some(today);
                state.last_accepted_duration = Some(minutes);
                if goal_count > 0 && state.completed_count_this_period >= goal_count {
                    state.was_capped_this_period = true;
                }
                state.last_reaction = Some(LastReaction::Completed);
            }
            MemoState::Backlog(state) => {
                state.previous_last_completed_day = state.last_completed_day;
                state.last_completed_day = Some(today);
                state.last_accepted_duration = Some(minutes);
                state.last_reaction = Some(LastReaction::Completed);
            }
            MemoState::Deadline(state) => {
                state.previous_last_completed_day = state.last_completed_day;
                self.predictor.record_completion(state, today, minutes);
                state.last_completed_day = Some(today);
                state.last_reaction = Some(LastReaction::Completed);
            }
        }
    }

    fn undo(&self, memo: &mut Memo, now: DateTime<Utc>) -> Result<(), InvalidReaction> {
        let today = now.date_naive();
        if memo.last_activity.date_naive() != today {
            return Err(InvalidReaction::UndoExpired {
                memo_id: memo.id.clone(),
            });
        }
        let goal_count = memo.recurrence_goal.map(|g| g.count).unwrap_or(0);
        match &mut memo.state {
            MemoState::Routine(state) => match state.last_reaction.take() {
                Some(LastReaction::Accepted) => {
                    state.accepted_today = false;
                    state.accepted_slot = None;
                    state.last_completed_day = state.previous_last_completed_day;
                }
                Some(LastReaction::Completed) => {
                    state.completed_count_this_period =
                        state.completed_count_this_period.saturating_sub(1);
                    state.completed_today = false;
                    state.last_completed_day = state.previous_last_completed_day;
                    state.was_capped_this_period =
                        goal_count > 0 && state.completed_count_this_period >= goal_count;
                }
                None => {
                    return Err(InvalidReaction::NothingToUndo {
                        memo_id: memo.id.clone(),
                    })
                }
            },
            MemoState::Backlog(state) => match state.last_reaction.take() {
                Some(LastReaction::Accepted) => {
                    state.accepted_today = false;
                    state.accepted_slot = None;
                    state.last_completed_day = state.previous_last_completed_day;
                }
                Some(LastReaction::Completed) => {
                    state.last_completed_day = state.previous_last_completed_day;
                }
                None => {
                    return Err(InvalidReaction::NothingToUndo {
                        memo_id: memo.id.clone(),
                    })
                }
            },
            MemoState::Deadline(state) => match state.last_reaction.take() {
                Some(LastReaction::Accepted) => {
                    // Drop the most recently committed slot for today.
                    if let Some(pos) =
                        state.accepted_slots.iter().rposition(|s| s.day == today)
                    {
                        state.accepted_slots.remove(pos);
                    }
                    state.last_completed_day = state.previous_last_completed_day;
                }
                Some(LastReaction::Completed) => {
                    self.predictor.undo_completion(state, today);
                    state.last_completed_day = state.previous_last_completed_day;
                }
                None => {
                    return Err(InvalidReaction::NothingToUndo {
                        memo_id: memo.id.clone(),
                    })
                }
            },
        }
        Ok(())
    }
}

impl Default for ReactionHandler {
    fn default() -> Self {
        Self::new()
    }
}
