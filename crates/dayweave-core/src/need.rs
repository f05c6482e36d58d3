//! Need calculation: continuous urgency per memo.
//!
//! Need is unitless, non-negative, monotonic in urgency and comparable
//! across memo kinds. Two thresholds partition the range:
//!
//! - below `hidden_threshold` (0.5): computed but hidden from the user
//! - at or above `mandatory_threshold` (1.0): must be placed before any
//!   optional candidate
//!
//! Each kind has its own gradient:
//!
//! - Deadline: rises from 0.5 at creation to 1.0 on the deadline day, and
//!   jumps past 1.0 as soon as the remaining expected work no longer fits
//!   the plausible capacity of the remaining days
//! - Routine: tracks schedule lag, the elapsed fraction of the period
//!   against the completed fraction of the goal
//! - Backlog: a slow "long untouched" ramp that never reaches mandatory
//!
//! The calculator assumes the period tracker already rolled the memo
//! forward to "now".

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::memo::{BacklogState, DeadlineState, Memo, MemoState, RoutineState};

/// Need calculator over an engine configuration.
pub struct NeedCalculator {
    config: EngineConfig,
}

impl NeedCalculator {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compute the need for a memo at `now`.
    ///
    /// Returns 0.0 for memos settled for the day (rejected, or accepted
    /// where the kind zeroes on acceptance).
    pub fn need(&self, memo: &Memo, now: DateTime<Utc>) -> f64 {
        match &memo.state {
            MemoState::Deadline(state) => self.deadline_need(memo, state, now),
            MemoState::Routine(state) => self.routine_need(memo, state, now),
            MemoState::Backlog(state) => self.backlog_need(memo, state, now),
        }
    }

    fn deadline_need(&self, memo: &Memo, state: &DeadlineState, now: DateTime<Utc>) -> f64 {
        if state.rejected_today {
            return 0.0;
        }
        if let Some(from) = memo.suggestion_available_from {
            if from > now {
                return 0.0;
            }
        }

        let remaining = memo
            .total_minutes_expected
            .saturating_sub(state.total_logged_minutes());
        if remaining == 0 {
            return 0.0;
        }

        let today = now.date_naive();
        let total_days = state.total_days();

        // Time gradient: 0.5 on the creation day, 1.0 on the deadline day.
        let ramp = if total_days <= 1 {
            1.0
        } else {
            let elapsed = (today - state.created_day)
                .num_days()
                .clamp(0, total_days as i64 - 1) as f64;
            0.5 + 0.5 * elapsed / (total_days as f64 - 1.0)
        };

        // Workload pressure: remaining work against plausible capacity of
        // the remaining days. >= 1.0 means the work no longer fits.
        let days_left = (state.deadline_day - today).num_days() + 1;
        let pressure = if days_left <= 0 {
            1.0
        } else {
            let capacity = days_left as f64 * self.config.daily_capacity_minutes.max(1) as f64;
            remaining as f64 / capacity
        };

        let need = ramp.max(pressure);
        if today >= state.deadline_day {
            need.max(self.config.mandatory_threshold)
        } else {
            need
        }
    }

    fn routine_need(&self, memo: &Memo, state: &RoutineState, now: DateTime<Utc>) -> f64 {
        if state.accepted_today || state.rejected_today {
            return 0.0;
        }
        let Some(goal) = memo.recurrence_goal else {
            return 0.0;
        };
        if goal.count == 0 {
            return 0.0;
        }

        let remaining = goal.count.saturating_sub(state.completed_count_this_period);
        if remaining == 0 && state.was_capped_this_period {
            return 0.0;
        }

        let today = now.date_naive();
        let period_len = goal.period.length_days(today).max(1) as i64;
        let elapsed = ((today - state.period_start_date).num_days() + 1).clamp(1, period_len);
        let days_left = period_len - elapsed + 1;

        // Schedule lag: elapsed fraction of the period minus completed
        // fraction of the goal. On pace sits at the visibility threshold.
        let lag = elapsed as f64 / period_len as f64
            - state.completed_count_this_period as f64 / goal.count as f64;
        let mut need = (0.5 + lag).max(0.0);

        // One completion per day at most: if the remaining days cannot
        // hold the remaining completions, the goal is at risk.
        if (remaining as i64) > days_left {
            need = need.max(self.config.mandatory_threshold);
        }
        need
    }

    fn backlog_need(&self, memo: &Memo, state: &BacklogState, now: DateTime<Utc>) -> f64 {
        if state.accepted_today || state.rejected_today {
            return 0.0;
        }
        let today = now.date_naive();
        let idle_days = (today - memo.last_activity.date_naive()).num_days().max(0) as f64;
        let ramp = self.config.backlog_ramp_days.max(1.0);
        (0.5 * idle_days / ramp).min(self.config.backlog_need_cap)
    }
}

impl Default for NeedCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::{
        Importance, LocationPreference, MemoKind, RecurrenceGoal, RecurrencePeriod,
    };
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_noon(day: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
    }

    fn deadline_memo(created: NaiveDate, deadline: NaiveDate, total: u32) -> Memo {
        Memo {
            id: "d-1".to_string(),
            title: "report".to_string(),
            kind: MemoKind::Deadline,
            created_at: at_noon(created),
            deadline: Some(deadline),
            recurrence_goal: None,
            location: LocationPreference::None,
            session_minutes: 30,
            total_minutes_expected: total,
            importance: Importance::Medium,
            genre: None,
            last_activity: at_noon(created),
            suggestion_available_from: None,
            state: MemoState::Deadline(DeadlineState::new(created, deadline, 30)),
        }
    }

    fn routine_memo(goal: RecurrenceGoal, period_start: NaiveDate) -> Memo {
        Memo {
            id: "r-1".to_string(),
            title: "run".to_string(),
            kind: MemoKind::Routine,
            created_at: at_noon(period_start),
            deadline: None,
            recurrence_goal: Some(goal),
            location: LocationPreference::None,
            session_minutes: 20,
            total_minutes_expected: 20,
            importance: Importance::Medium,
            genre: None,
            last_activity: at_noon(period_start),
            suggestion_available_from: None,
            state: MemoState::Routine(RoutineState::new(period_start)),
        }
    }

    fn backlog_memo(last_active: NaiveDate) -> Memo {
        Memo {
            id: "b-1".to_string(),
            title: "photos".to_string(),
            kind: MemoKind::Backlog,
            created_at: at_noon(last_active),
            deadline: None,
            recurrence_goal: None,
            location: LocationPreference::None,
            session_minutes: 25,
            total_minutes_expected: 50,
            importance: Importance::Low,
            genre: None,
            last_activity: at_noon(last_active),
            suggestion_available_from: None,
            state: MemoState::Backlog(BacklogState::new()),
        }
    }

    #[test]
    fn deadline_need_rises_toward_deadline() {
        let memo = deadline_memo(date(2026, 8, 1), date(2026, 8, 10), 150);
        let calc = NeedCalculator::new();
        let early = calc.need(&memo, at_noon(date(2026, 8, 2)));
        let late = calc.need(&memo, at_noon(date(2026, 8, 8)));
        assert!(late > early, "need must rise: {early} -> {late}");
        assert!(early >= 0.5);
        assert!(late < 1.0);
    }

    #[test]
    fn deadline_day_is_mandatory() {
        let memo = deadline_memo(date(2026, 8, 1), date(2026, 8, 10), 150);
        let calc = NeedCalculator::new();
        assert!(calc.need(&memo, at_noon(date(2026, 8, 10))) >= 1.0);
        assert!(calc.need(&memo, at_noon(date(2026, 8, 12))) >= 1.0);
    }

    #[test]
    fn deadline_insufficient_capacity_is_mandatory() {
        // 600 minutes left, 2 days at 120 min/day of capacity.
        let memo = deadline_memo(date(2026, 8, 1), date(2026, 8, 10), 600);
        let calc = NeedCalculator::new();
        let need = calc.need(&memo, at_noon(date(2026, 8, 9)));
        assert!(need >= 1.0, "got {need}");
    }

    #[test]
    fn deadline_rejected_today_is_zero() {
        let mut memo = deadline_memo(date(2026, 8, 1), date(2026, 8, 10), 150);
        if let MemoState::Deadline(s) = &mut memo.state {
            s.rejected_today = true;
        }
        assert_eq!(
            NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 10))),
            0.0
        );
    }

    #[test]
    fn deadline_waits_for_availability() {
        let mut memo = deadline_memo(date(2026, 8, 1), date(2026, 8, 10), 150);
        memo.suggestion_available_from = Some(at_noon(date(2026, 8, 8)));
        let calc = NeedCalculator::new();
        assert_eq!(calc.need(&memo, at_noon(date(2026, 8, 5))), 0.0);
        assert!(calc.need(&memo, at_noon(date(2026, 8, 9))) > 0.0);
    }

    #[test]
    fn deadline_fully_logged_is_zero() {
        let mut memo = deadline_memo(date(2026, 8, 1), date(2026, 8, 10), 100);
        if let MemoState::Deadline(s) = &mut memo.state {
            s.actual_minutes[0] = 100;
        }
        assert_eq!(
            NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 5))),
            0.0
        );
    }

    #[test]
    fn routine_on_pace_sits_near_threshold() {
        // Week goal of 3; day 1, nothing done yet.
        let goal = RecurrenceGoal {
            count: 3,
            period: RecurrencePeriod::Week,
        };
        let memo = routine_memo(goal, date(2026, 8, 3));
        let need = NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 3)));
        assert!(need > 0.5 && need < 0.8, "got {need}");
    }

    #[test]
    fn routine_lag_raises_need() {
        let goal = RecurrenceGoal {
            count: 3,
            period: RecurrencePeriod::Week,
        };
        let memo = routine_memo(goal, date(2026, 8, 3));
        let calc = NeedCalculator::new();
        let early = calc.need(&memo, at_noon(date(2026, 8, 3)));
        let later = calc.need(&memo, at_noon(date(2026, 8, 6)));
        assert!(later > early);
    }

    #[test]
    fn routine_goal_at_risk_is_mandatory() {
        // 3 to go, 2 days left in the week.
        let goal = RecurrenceGoal {
            count: 3,
            period: RecurrencePeriod::Week,
        };
        let memo = routine_memo(goal, date(2026, 8, 3));
        let need = NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 8)));
        assert!(need >= 1.0, "got {need}");
    }

    #[test]
    fn routine_capped_period_is_zero() {
        let goal = RecurrenceGoal {
            count: 3,
            period: RecurrencePeriod::Week,
        };
        let mut memo = routine_memo(goal, date(2026, 8, 3));
        if let MemoState::Routine(s) = &mut memo.state {
            s.completed_count_this_period = 3;
            s.was_capped_this_period = true;
        }
        assert_eq!(
            NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 7))),
            0.0
        );
    }

    #[test]
    fn routine_ahead_of_pace_is_hidden() {
        let goal = RecurrenceGoal {
            count: 3,
            period: RecurrencePeriod::Week,
        };
        let mut memo = routine_memo(goal, date(2026, 8, 3));
        if let MemoState::Routine(s) = &mut memo.state {
            s.completed_count_this_period = 2;
        }
        let need = NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 4)));
        assert!(need < 0.5, "got {need}");
    }

    #[test]
    fn routine_settled_today_is_zero() {
        let goal = RecurrenceGoal {
            count: 3,
            period: RecurrencePeriod::Week,
        };
        let mut memo = routine_memo(goal, date(2026, 8, 3));
        if let MemoState::Routine(s) = &mut memo.state {
            s.accepted_today = true;
        }
        assert_eq!(
            NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 5))),
            0.0
        );
    }

    #[test]
    fn daily_routine_not_done_is_mandatory() {
        let goal = RecurrenceGoal {
            count: 1,
            period: RecurrencePeriod::Day,
        };
        let memo = routine_memo(goal, date(2026, 8, 6));
        let need = NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 6)));
        assert!(need >= 1.0, "got {need}");
    }

    #[test]
    fn backlog_ramps_with_idle_time() {
        let memo = backlog_memo(date(2026, 8, 1));
        let calc = NeedCalculator::new();
        let fresh = calc.need(&memo, at_noon(date(2026, 8, 1)));
        let week = calc.need(&memo, at_noon(date(2026, 8, 8)));
        assert_eq!(fresh, 0.0);
        assert!((week - 0.5).abs() < 1e-9, "got {week}");
    }

    #[test]
    fn backlog_never_reaches_mandatory() {
        let memo = backlog_memo(date(2026, 1, 1));
        let need = NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 6)));
        assert!(need < 1.0);
        assert_eq!(need, EngineConfig::default().backlog_need_cap);
    }

    #[test]
    fn backlog_rejected_today_is_zero() {
        let mut memo = backlog_memo(date(2026, 7, 1));
        if let MemoState::Backlog(s) = &mut memo.state {
            s.rejected_today = true;
        }
        assert_eq!(
            NeedCalculator::new().need(&memo, at_noon(date(2026, 8, 6))),
            0.0
        );
    }
}
