//! Memo types and per-kind state records.
//!
//! A memo is a user task tracked by the engine. Behavior branches on its
//! kind (deadline / backlog / routine) throughout, so each memo carries a
//! tagged state union matching its kind:
//!
//! - [`DeadlineState`]: fixed-length duration curves indexed by day-offset,
//!   plus the adaptive multiplier fed by completed sessions
//! - [`RoutineState`]: per-day flags and the period completion counter
//! - [`BacklogState`]: per-day flags only
//!
//! The state records are mutated exclusively by the period tracker
//! (rollover) and the reaction handler (accept/reject/complete/undo).

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;

/// Kind of memo. Closed set; scoring, prediction and allocation all
/// branch on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoKind {
    /// Work toward a fixed calendar date.
    Deadline,
    /// Undated work that should not be forgotten.
    Backlog,
    /// Recurring work with a per-period completion goal.
    Routine,
}

impl MemoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deadline => "deadline",
            Self::Backlog => "backlog",
            Self::Routine => "routine",
        }
    }
}

/// Discrete importance level set by the user or the enrichment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// Additive score contribution used for allocation tie-breaking.
    pub fn score(&self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 0.2,
            Self::High => 0.4,
        }
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance::Medium
    }
}

/// Where the user prefers to work on a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPreference {
    Home,
    Workplace,
    /// No preference; compatible with any gap.
    None,
}

impl Default for LocationPreference {
    fn default() -> Self {
        LocationPreference::None
    }
}

/// Tracking window for a routine goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePeriod {
    Day,
    Week,
    Month,
}

impl RecurrencePeriod {
    /// Calendar-aligned start of the period containing `day`.
    ///
    /// Weeks start on Monday, months on the 1st.
    pub fn start_of(&self, day: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => day,
            Self::Week => {
                let offset = day.weekday().num_days_from_monday() as i64;
                day - chrono::Duration::days(offset)
            }
            Self::Month => day.with_day(1).unwrap_or(day),
        }
    }

    /// Number of days in the period containing `day`.
    pub fn length_days(&self, day: NaiveDate) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => {
                let start = self.start_of(day);
                let next = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
                };
                match next {
                    Some(n) => (n - start).num_days() as u32,
                    None => 30,
                }
            }
        }
    }
}

/// Completion goal for a routine memo: `count` sessions per `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceGoal {
    pub count: u32,
    pub period: RecurrencePeriod,
}

/// A time window the user committed to.
///
/// Deadline memos may hold slots on future days, so the day is part of
/// the slot rather than implied by "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedSlot {
    pub day: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AcceptedSlot {
    pub fn new(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Which user reaction most recently mutated a state record.
///
/// Drives undo: only the most recent accept/complete of the current day
/// can be reversed. Cleared on day rollover and after a successful undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastReaction {
    Accepted,
    Completed,
}

/// State record for routine memos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineState {
    pub accepted_today: bool,
    pub completed_today: bool,
    /// Completions counted against the recurrence goal this period.
    pub completed_count_this_period: u32,
    pub last_completed_day: Option<NaiveDate>,
    pub period_start_date: NaiveDate,
    /// Sticky once the period goal is met; later completions still count
    /// but are surfaced as capped.
    pub was_capped_this_period: bool,
    pub rejected_today: bool,
    pub accepted_slot: Option<AcceptedSlot>,
    /// Logged minutes of the last completed session; seeds the next
    /// session's ideal duration.
    pub last_accepted_duration: Option<u32>,
    /// Pre-reaction value of `last_completed_day`, kept for undo.
    pub previous_last_completed_day: Option<NaiveDate>,
    pub last_reaction: Option<LastReaction>,
}

impl RoutineState {
    pub fn new(period_start_date: NaiveDate) -> Self {
        Self {
            accepted_today: false,
            completed_today: false,
            completed_count_this_period: 0,
            last_completed_day: None,
            period_start_date,
            was_capped_this_period: false,
            rejected_today: false,
            accepted_slot: None,
            last_accepted_duration: None,
            previous_last_completed_day: None,
            last_reaction: None,
        }
    }
}

/// State record for deadline memos.
///
/// `actual_minutes` and `expected_minutes` are fixed-length arrays indexed
/// by day-offset from `created_day`; both always hold exactly
/// `total_days = deadline_day - created_day + 1` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineState {
    pub created_day: NaiveDate,
    pub deadline_day: NaiveDate,
    /// Logged minutes per day-offset, accumulated by completions.
    pub actual_minutes: Vec<u32>,
    /// Non-decreasing expected session curve, seeded at creation.
    pub expected_minutes: Vec<u32>,
    /// Exponentially smoothed actual/expected ratio, clamped to a sane
    /// range so one outlier session cannot run away with the estimate.
    pub smoothed_multiplier: f64,
    pub rejected_today: bool,
    /// Committed sessions; deadline memos may accrue several before the
    /// deadline, on different days.
    pub accepted_slots: Vec<AcceptedSlot>,
    pub last_completed_day: Option<NaiveDate>,
    pub previous_last_completed_day: Option<NaiveDate>,
    /// Minutes of the most recent completion, kept for undo.
    pub last_logged_minutes: Option<u32>,
    /// Multiplier value before the most recent completion, kept for undo.
    pub previous_smoothed_multiplier: f64,
    pub last_reaction: Option<LastReaction>,
}

impl DeadlineState {
    /// Create a deadline state with the expected curve pre-seeded.
    ///
    /// The curve rises linearly from `session_minutes` on day 0 to
    /// `5 × session_minutes` on the final day. A single-day deadline
    /// keeps the user's own estimate.
    pub fn new(created_day: NaiveDate, deadline_day: NaiveDate, session_minutes: u32) -> Self {
        let total_days = Self::span_days(created_day, deadline_day);
        let expected = seed_expected_curve(session_minutes, total_days);
        Self {
            created_day,
            deadline_day,
            actual_minutes: vec![0; total_days],
            expected_minutes: expected,
            smoothed_multiplier: 1.0,
            rejected_today: false,
            accepted_slots: Vec::new(),
            last_completed_day: None,
            previous_last_completed_day: None,
            last_logged_minutes: None,
            previous_smoothed_multiplier: 1.0,
            last_reaction: None,
        }
    }

    /// Number of curve entries for the given span (inclusive of both ends).
    pub fn span_days(created_day: NaiveDate, deadline_day: NaiveDate) -> usize {
        ((deadline_day - created_day).num_days().max(0) as usize) + 1
    }

    pub fn total_days(&self) -> usize {
        Self::span_days(self.created_day, self.deadline_day)
    }

    /// Day-offset of `day`, clamped into the curve range.
    pub fn offset_of(&self, day: NaiveDate) -> usize {
        let raw = (day - self.created_day).num_days();
        raw.clamp(0, self.total_days() as i64 - 1) as usize
    }

    /// Total minutes logged across all days.
    pub fn total_logged_minutes(&self) -> u32 {
        self.actual_minutes.iter().sum()
    }

    /// Slots committed for `day`.
    pub fn slots_on(&self, day: NaiveDate) -> impl Iterator<Item = &AcceptedSlot> {
        self.accepted_slots.iter().filter(move |s| s.day == day)
    }
}

/// Seed the expected-duration curve: linear from `base` to `5 × base`.
pub(crate) fn seed_expected_curve(base: u32, total_days: usize) -> Vec<u32> {
    if total_days <= 1 {
        return vec![base.max(1); total_days.max(1)];
    }
    let base = base.max(1) as f64;
    let last = total_days as f64 - 1.0;
    (0..total_days)
        .map(|i| {
            let t = i as f64 / last;
            (base + t * (5.0 * base - base)).round() as u32
        })
        .collect()
}

/// State record for backlog memos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogState {
    pub accepted_today: bool,
    pub rejected_today: bool,
    pub last_completed_day: Option<NaiveDate>,
    pub previous_last_completed_day: Option<NaiveDate>,
    pub accepted_slot: Option<AcceptedSlot>,
    pub last_accepted_duration: Option<u32>,
    pub last_reaction: Option<LastReaction>,
}

impl BacklogState {
    pub fn new() -> Self {
        Self {
            accepted_today: false,
            rejected_today: false,
            last_completed_day: None,
            previous_last_completed_day: None,
            accepted_slot: None,
            last_accepted_duration: None,
            last_reaction: None,
        }
    }
}

impl Default for BacklogState {
    fn default() -> Self {
        Self::new()
    }
}

/// Tagged state union; exactly one variant, matching the memo kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemoState {
    Deadline(DeadlineState),
    Backlog(BacklogState),
    Routine(RoutineState),
}

impl MemoState {
    pub fn kind(&self) -> MemoKind {
        match self {
            Self::Deadline(_) => MemoKind::Deadline,
            Self::Backlog(_) => MemoKind::Backlog,
            Self::Routine(_) => MemoKind::Routine,
        }
    }
}

/// A user task tracked by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    /// Unique identifier
    pub id: String,
    pub title: String,
    /// Kind tag; must match the attached state variant.
    pub kind: MemoKind,
    pub created_at: DateTime<Utc>,
    /// Target date; required iff kind is deadline.
    pub deadline: Option<NaiveDate>,
    /// Completion goal; present iff kind is routine.
    pub recurrence_goal: Option<RecurrenceGoal>,
    #[serde(default)]
    pub location: LocationPreference,
    /// Ideal minutes per working session.
    pub session_minutes: u32,
    /// Expected total minutes to finish the whole memo.
    pub total_minutes_expected: u32,
    #[serde(default)]
    pub importance: Importance,
    /// Display metadata from the enrichment service; never scored.
    #[serde(default)]
    pub genre: Option<String>,
    /// Updated only by accept/reject/complete, never by edits or drags.
    /// The period tracker reads this to detect day boundaries.
    pub last_activity: DateTime<Utc>,
    /// Suggestions are suppressed until this instant (event-linked memos).
    #[serde(default)]
    pub suggestion_available_from: Option<DateTime<Utc>>,
    pub state: MemoState,
}

impl Memo {
    /// Check the memo's data integrity.
    ///
    /// A violation is a data fault: the memo is excluded from scoring,
    /// never a crash.
    pub fn integrity(&self) -> Result<(), IntegrityError> {
        if self.kind != self.state.kind() {
            return Err(IntegrityError::StateMismatch {
                memo_id: self.id.clone(),
                kind: self.kind.as_str(),
                state: self.state.kind().as_str(),
            });
        }
        match (&self.state, self.kind) {
            (MemoState::Deadline(state), MemoKind::Deadline) => {
                if self.deadline.is_none() {
                    return Err(IntegrityError::MissingDeadline {
                        memo_id: self.id.clone(),
                    });
                }
                let total = state.total_days();
                if state.actual_minutes.len() != total || state.expected_minutes.len() != total {
                    return Err(IntegrityError::CurveLengthMismatch {
                        memo_id: self.id.clone(),
                        expected: total,
                        actual: state.actual_minutes.len().min(state.expected_minutes.len()),
                    });
                }
            }
            (MemoState::Routine(_), MemoKind::Routine) => {
                if self.recurrence_goal.is_none() {
                    return Err(IntegrityError::MissingRecurrenceGoal {
                        memo_id: self.id.clone(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether the memo already has a committed slot for `day`.
    pub fn accepted_on(&self, day: NaiveDate) -> bool {
        match &self.state {
            MemoState::Deadline(s) => s.slots_on(day).next().is_some(),
            MemoState::Backlog(s) => s.accepted_today && s.accepted_slot.is_some(),
            MemoState::Routine(s) => s.accepted_today,
        }
    }

    /// Whether the memo was rejected today (as of the last rollover).
    pub fn rejected_today(&self) -> bool {
        match &self.state {
            MemoState::Deadline(s) => s.rejected_today,
            MemoState::Backlog(s) => s.rejected_today,
            MemoState::Routine(s) => s.rejected_today,
        }
    }
}
