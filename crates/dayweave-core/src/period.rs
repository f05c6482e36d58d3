//! Day and period rollover for memo state records.
//!
//! The tracker never runs on a schedule of its own. It is invoked lazily
//! whenever a memo is read for scoring, and in bulk by the external
//! day-boundary trigger. Rollover is idempotent: running it twice with the
//! same "now" produces no further change.
//!
//! On day rollover the per-day flags (`accepted_today`, `rejected_today`,
//! `completed_today`) and the day's accepted slot are cleared, and the undo
//! window expires. Deadline memos keep slots committed for future days
//! until the deadline itself has passed. On period rollover (routine only)
//! the completion counter and cap flag reset and the period start advances
//! to the calendar-aligned start of the new period.

use chrono::NaiveDate;

use crate::memo::{
    BacklogState, DeadlineState, Memo, MemoState, RecurrenceGoal, RoutineState,
};

/// Roll a memo's state forward to `today`.
///
/// Returns `true` if anything changed. Mutates the state record in place;
/// the caller persists the result.
pub fn roll_over(memo: &mut Memo, today: NaiveDate) -> bool {
    let last_active_day = memo.last_activity.date_naive();
    let day_advanced = last_active_day < today;

    match &mut memo.state {
        MemoState::Routine(state) => {
            let goal = memo.recurrence_goal;
            roll_routine(state, goal, today, day_advanced)
        }
        MemoState::Deadline(state) => roll_deadline(state, today, day_advanced),
        MemoState::Backlog(state) => roll_backlog(state, day_advanced),
    }
}

fn roll_routine(
    state: &mut RoutineState,
    goal: Option<RecurrenceGoal>,
    today: NaiveDate,
    day_advanced: bool,
) -> bool {
    let mut changed = false;

    if day_advanced {
        changed |= clear_day_flags_routine(state);
    }

    if let Some(goal) = goal {
        let new_start = goal.period.start_of(today);
        if state.period_start_date < new_start {
            state.completed_count_this_period = 0;
            state.was_capped_this_period = false;
            state.period_start_date = new_start;
            changed = true;
        }
    }

    changed
}

fn clear_day_flags_routine(state: &mut RoutineState) -> bool {
    let had = state.accepted_today
        || state.rejected_today
        || state.completed_today
        || state.accepted_slot.is_some()
        || state.last_reaction.is_some()
        || state.previous_last_completed_day != state.last_completed_day;
    state.accepted_today = false;
    state.rejected_today = false;
    state.completed_today = false;
    state.accepted_slot = None;
    state.last_reaction = None;
    // Undo window closed: resync the undo cache with the live value.
    state.previous_last_completed_day = state.last_completed_day;
    had
}

fn roll_deadline(state: &mut DeadlineState, today: NaiveDate, day_advanced: bool) -> bool {
    if !day_advanced {
        return false;
    }

    let mut changed = state.rejected_today
        || state.last_reaction.is_some()
        || state.last_logged_minutes.is_some()
        || state.previous_last_completed_day != state.last_completed_day
        || state.previous_smoothed_multiplier != state.smoothed_multiplier;
    state.rejected_today = false;
    state.last_reaction = None;
    state.last_logged_minutes = None;
    state.previous_last_completed_day = state.last_completed_day;
    state.previous_smoothed_multiplier = state.smoothed_multiplier;

    // Slots on future days survive mid-deadline; everything goes once the
    // deadline itself has passed.
    let before = state.accepted_slots.len();
    if today > state.deadline_day {
        state.accepted_slots.clear();
    } else {
        state.accepted_slots.retain(|slot| slot.day >= today);
    }
    changed |= state.accepted_slots.len() != before;

    changed
}

fn roll_backlog(state: &mut BacklogState, day_advanced: bool) -> bool {
    if !day_advanced {
        return false;
    }
    let had = state.accepted_today
        || state.rejected_today
        || state.accepted_slot.is_some()
        || state.last_reaction.is_some()
        || state.previous_last_completed_day != state.last_completed_day;
    state.accepted_today = false;
    state.rejected_today = false;
    state.accepted_slot = None;
    state.last_reaction = None;
    state.previous_last_completed_day = state.last_completed_day;
    had
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::{
        AcceptedSlot, Importance, LastReaction, LocationPreference, MemoKind, RecurrencePeriod,
    };
    use chrono::{NaiveTime, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn routine_memo(last_active: NaiveDate, period_start: NaiveDate) -> Memo {
        let last_activity = Utc
            .from_utc_datetime(&last_active.and_hms_opt(12, 0, 0).unwrap());
        Memo {
            id: "r-1".to_string(),
            title: "stretch".to_string(),
            kind: MemoKind::Routine,
            created_at: last_activity,
            deadline: None,
            recurrence_goal: Some(RecurrenceGoal {
                count: 3,
                period: RecurrencePeriod::Week,
            }),
            location: LocationPreference::None,
            session_minutes: 20,
            total_minutes_expected: 20,
            importance: Importance::Medium,
            genre: None,
            last_activity,
            suggestion_available_from: None,
            state: MemoState::Routine(RoutineState::new(period_start)),
        }
    }

    #[test]
    fn same_day_is_a_no_op() {
        let today = date(2026, 8, 6);
        let mut memo = routine_memo(today, date(2026, 8, 3));
        if let MemoState::Routine(s) = &mut memo.state {
            s.accepted_today = true;
        }
        assert!(!roll_over(&mut memo, today));
        if let MemoState::Routine(s) = &memo.state {
            assert!(s.accepted_today);
        }
    }

    #[test]
    fn day_rollover_clears_daily_flags() {
        let mut memo = routine_memo(date(2026, 8, 5), date(2026, 8, 3));
        if let MemoState::Routine(s) = &mut memo.state {
            s.accepted_today = true;
            s.rejected_today = false;
            s.accepted_slot = Some(AcceptedSlot::new(date(2026, 8, 5), time(9, 0), time(9, 30)));
            s.last_reaction = Some(LastReaction::Accepted);
        }
        assert!(roll_over(&mut memo, date(2026, 8, 6)));
        if let MemoState::Routine(s) = &memo.state {
            assert!(!s.accepted_today);
            assert!(!s.rejected_today);
            assert!(s.accepted_slot.is_none());
            assert!(s.last_reaction.is_none());
        }
    }

    #[test]
    fn accepted_and_rejected_never_both_set_after_rollover() {
        let mut memo = routine_memo(date(2026, 8, 5), date(2026, 8, 3));
        if let MemoState::Routine(s) = &mut memo.state {
            s.accepted_today = true;
            s.rejected_today = true; // corrupted input
        }
        roll_over(&mut memo, date(2026, 8, 6));
        if let MemoState::Routine(s) = &memo.state {
            assert!(!(s.accepted_today && s.rejected_today));
        }
    }

    #[test]
    fn week_rollover_resets_period_counters() {
        // Period started Monday 7/27; today is Monday 8/3 of the next week.
        let mut memo = routine_memo(date(2026, 7, 31), date(2026, 7, 27));
        if let MemoState::Routine(s) = &mut memo.state {
            s.completed_count_this_period = 3;
            s.was_capped_this_period = true;
        }
        assert!(roll_over(&mut memo, date(2026, 8, 3)));
        if let MemoState::Routine(s) = &memo.state {
            assert_eq!(s.completed_count_this_period, 0);
            assert!(!s.was_capped_this_period);
            assert_eq!(s.period_start_date, date(2026, 8, 3));
        }
    }

    #[test]
    fn mid_period_keeps_counters() {
        let mut memo = routine_memo(date(2026, 8, 4), date(2026, 8, 3));
        if let MemoState::Routine(s) = &mut memo.state {
            s.completed_count_this_period = 2;
        }
        roll_over(&mut memo, date(2026, 8, 6));
        if let MemoState::Routine(s) = &memo.state {
            assert_eq!(s.completed_count_this_period, 2);
            assert_eq!(s.period_start_date, date(2026, 8, 3));
        }
    }

    #[test]
    fn rollover_is_idempotent() {
        let mut memo = routine_memo(date(2026, 7, 31), date(2026, 7, 27));
        if let MemoState::Routine(s) = &mut memo.state {
            s.accepted_today = true;
            s.completed_count_this_period = 3;
        }
        let today = date(2026, 8, 6);
        roll_over(&mut memo, today);
        let snapshot = memo.clone();
        assert!(!roll_over(&mut memo, today));
        assert_eq!(memo, snapshot);
    }

    fn deadline_memo(last_active: NaiveDate, created: NaiveDate, deadline: NaiveDate) -> Memo {
        let last_activity = Utc
            .from_utc_datetime(&last_active.and_hms_opt(12, 0, 0).unwrap());
        Memo {
            id: "d-1".to_string(),
            title: "ship report".to_string(),
            kind: MemoKind::Deadline,
            created_at: last_activity,
            deadline: Some(deadline),
            recurrence_goal: None,
            location: LocationPreference::None,
            session_minutes: 30,
            total_minutes_expected: 150,
            importance: Importance::Medium,
            genre: None,
            last_activity,
            suggestion_available_from: None,
            state: MemoState::Deadline(DeadlineState::new(created, deadline, 30)),
        }
    }

    #[test]
    fn deadline_keeps_future_slots_mid_deadline() {
        let mut memo = deadline_memo(date(2026, 8, 4), date(2026, 8, 1), date(2026, 8, 10));
        if let MemoState::Deadline(s) = &mut memo.state {
            s.accepted_slots = vec![
                AcceptedSlot::new(date(2026, 8, 4), time(9, 0), time(9, 30)),
                AcceptedSlot::new(date(2026, 8, 7), time(9, 0), time(9, 30)),
            ];
        }
        roll_over(&mut memo, date(2026, 8, 5));
        if let MemoState::Deadline(s) = &memo.state {
            assert_eq!(s.accepted_slots.len(), 1);
            assert_eq!(s.accepted_slots[0].day, date(2026, 8, 7));
        }
    }

    #[test]
    fn deadline_passed_clears_all_slots() {
        let mut memo = deadline_memo(date(2026, 8, 9), date(2026, 8, 1), date(2026, 8, 10));
        if let MemoState::Deadline(s) = &mut memo.state {
            s.accepted_slots = vec![AcceptedSlot::new(
                date(2026, 8, 12),
                time(9, 0),
                time(9, 30),
            )];
        }
        roll_over(&mut memo, date(2026, 8, 11));
        if let MemoState::Deadline(s) = &memo.state {
            assert!(s.accepted_slots.is_empty());
        }
    }

    #[test]
    fn backlog_rollover_clears_flags() {
        let last_activity = Utc
            .from_utc_datetime(&date(2026, 8, 5).and_hms_opt(18, 0, 0).unwrap());
        let mut memo = Memo {
            id: "b-1".to_string(),
            title: "sort photos".to_string(),
            kind: MemoKind::Backlog,
            created_at: last_activity,
            deadline: None,
            recurrence_goal: None,
            location: LocationPreference::Home,
            session_minutes: 25,
            total_minutes_expected: 50,
            importance: Importance::Low,
            genre: None,
            last_activity,
            suggestion_available_from: None,
            state: MemoState::Backlog(BacklogState::new()),
        };
        if let MemoState::Backlog(s) = &mut memo.state {
            s.rejected_today = true;
        }
        assert!(roll_over(&mut memo, date(2026, 8, 6)));
        if let MemoState::Backlog(s) = &memo.state {
            assert!(!s.rejected_today);
        }
    }
}
