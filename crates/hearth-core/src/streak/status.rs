//! Streak status calculation.
//!
//! The status is rebuilt from the complete activity history on every call.
//! No running counters are stored, so a corrected past record or a late
//! joker simply shows up in the next recomputation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::activity::DailyActivity;
use crate::error::{EngineError, Result};

/// Streak state of one user as of a given calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStatus {
    pub user_id: String,
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    /// Historical maximum
    pub longest_streak: u32,
    pub last_active_date: Option<NaiveDate>,
    /// First active day of the current run
    pub streak_start_date: Option<NaiveDate>,
    pub total_days_active: u32,
    pub is_active_today: bool,
    /// Advisory: the run is alive but today has not been secured yet
    pub risk_of_break: bool,
    /// Calendar day this status was computed for
    pub as_of: NaiveDate,
}

impl StreakStatus {
    /// All-zero status for a user without history.
    pub fn empty(user_id: impl Into<String>, as_of: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
            streak_start_date: None,
            total_days_active: 0,
            is_active_today: false,
            risk_of_break: false,
            as_of,
        }
    }

    /// Days between the last active day and `as_of`.
    pub fn days_since_last_active(&self) -> Option<i64> {
        self.last_active_date
            .map(|last| (self.as_of - last).num_days())
    }
}

/// Calculate a user's streak status from their activity history.
///
/// Records dated after `today` are ignored. Records of another user or two
/// records for the same day are rejected as caller errors.
pub fn calculate_streak_status(
    user_id: &str,
    activities: &[DailyActivity],
    today: NaiveDate,
) -> Result<StreakStatus> {
    calculate_streak_status_with_jokers(user_id, activities, &[], today)
}

/// Calculate a streak status where joker-covered days bridge the run.
///
/// A covered day keeps the run alive without adding to its length. A day
/// that is both active and covered counts as active.
pub fn calculate_streak_status_with_jokers(
    user_id: &str,
    activities: &[DailyActivity],
    covered_dates: &[NaiveDate],
    today: NaiveDate,
) -> Result<StreakStatus> {
    let days = index_days(user_id, activities)?;

    let active: BTreeSet<NaiveDate> = days
        .iter()
        .filter(|(date, active)| **active && **date <= today)
        .map(|(date, _)| *date)
        .collect();

    if active.is_empty() {
        return Ok(StreakStatus::empty(user_id, today));
    }

    let bridged: BTreeSet<NaiveDate> = covered_dates
        .iter()
        .copied()
        .filter(|date| *date <= today && !active.contains(date))
        .collect();

    let alive = |date: NaiveDate| active.contains(&date) || bridged.contains(&date);

    let longest_streak = longest_run(&active, &bridged);

    let yesterday = today.pred_opt();
    let anchor = if alive(today) {
        Some(today)
    } else {
        yesterday.filter(|y| alive(*y))
    };

    let mut current_streak = 0u32;
    let mut streak_start_date = None;
    let mut cursor = anchor;
    while let Some(date) = cursor {
        if !alive(date) {
            break;
        }
        if active.contains(&date) {
            current_streak += 1;
            streak_start_date = Some(date);
        }
        cursor = date.pred_opt();
    }

    let is_active_today = active.contains(&today);
    let risk_of_break = current_streak > 0 && !alive(today);

    Ok(StreakStatus {
        user_id: user_id.to_string(),
        current_streak,
        longest_streak,
        last_active_date: active.iter().next_back().copied(),
        streak_start_date,
        total_days_active: active.len() as u32,
        is_active_today,
        risk_of_break,
        as_of: today,
    })
}

/// Index records by day, validating ownership and uniqueness.
fn index_days(user_id: &str, activities: &[DailyActivity]) -> Result<BTreeMap<NaiveDate, bool>> {
    let mut days = BTreeMap::new();
    for record in activities {
        if record.user_id != user_id {
            return Err(EngineError::ForeignActivity {
                expected: user_id.to_string(),
                found: record.user_id.clone(),
            });
        }
        if days.insert(record.date, record.was_active_day).is_some() {
            return Err(EngineError::DuplicateActivityDay {
                user_id: user_id.to_string(),
                date: record.date,
            });
        }
    }
    Ok(days)
}

/// Longest run of active days, with bridged days joining neighbours.
fn longest_run(active: &BTreeSet<NaiveDate>, bridged: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for date in active.union(bridged) {
        let contiguous = previous
            .and_then(|p| p.checked_add_days(Days::new(1)))
            .is_some_and(|next| next == *date);
        if !contiguous {
            run = 0;
        }
        if active.contains(date) {
            run += 1;
            longest = longest.max(run);
        }
        previous = Some(*date);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::ActivityThreshold;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn active(user: &str, d: u32) -> DailyActivity {
        DailyActivity::new(user, day(d), 2, 0, 2.0, &ActivityThreshold::default())
    }

    fn run(user: &str, from: u32, to: u32) -> Vec<DailyActivity> {
        (from..=to).map(|d| active(user, d)).collect()
    }

    #[test]
    fn empty_history_is_all_zero() {
        let status = calculate_streak_status("ava", &[], day(10)).unwrap();
        assert_eq!(status, StreakStatus::empty("ava", day(10)));
    }

    #[test]
    fn seven_days_ending_today() {
        let status = calculate_streak_status("ava", &run("ava", 4, 10), day(10)).unwrap();
        assert_eq!(status.current_streak, 7);
        assert_eq!(status.longest_streak, 7);
        assert!(status.is_active_today);
        assert!(!status.risk_of_break);
        assert_eq!(status.streak_start_date, Some(day(4)));
        assert_eq!(status.total_days_active, 7);
    }

    #[test]
    fn inactive_day_two_days_ago_splits_the_run() {
        let mut history = run("ava", 4, 10);
        history[4] = DailyActivity::inactive("ava", day(8));

        let status = calculate_streak_status("ava", &history, day(10)).unwrap();
        assert_eq!(status.current_streak, 2);
        assert_eq!(status.longest_streak, 4);
        assert_eq!(status.streak_start_date, Some(day(9)));
    }

    #[test]
    fn yesterday_active_today_not_is_at_risk() {
        let status = calculate_streak_status("ava", &run("ava", 6, 9), day(10)).unwrap();
        assert_eq!(status.current_streak, 4);
        assert!(!status.is_active_today);
        assert!(status.risk_of_break);
    }

    #[test]
    fn two_quiet_days_reset_current_but_keep_longest() {
        let status = calculate_streak_status("ava", &run("ava", 1, 5), day(8)).unwrap();
        assert_eq!(status.current_streak, 0);
        assert_eq!(status.longest_streak, 5);
        assert_eq!(status.last_active_date, Some(day(5)));
        assert_eq!(status.streak_start_date, None);
        assert!(!status.risk_of_break);
        assert_eq!(status.days_since_last_active(), Some(3));
    }

    #[test]
    fn future_records_are_ignored() {
        let status = calculate_streak_status("ava", &run("ava", 8, 12), day(10)).unwrap();
        assert_eq!(status.current_streak, 3);
        assert_eq!(status.total_days_active, 3);
    }

    #[test]
    fn unordered_input_gives_same_result() {
        let mut history = run("ava", 1, 6);
        history.reverse();
        let status = calculate_streak_status("ava", &history, day(6)).unwrap();
        assert_eq!(status.current_streak, 6);
    }

    #[test]
    fn covered_day_bridges_without_counting() {
        let mut history = run("ava", 1, 4);
        history.extend(run("ava", 6, 7));
        let status =
            calculate_streak_status_with_jokers("ava", &history, &[day(5)], day(7)).unwrap();
        assert_eq!(status.current_streak, 6);
        assert_eq!(status.longest_streak, 6);
        assert_eq!(status.streak_start_date, Some(day(1)));
    }

    #[test]
    fn covered_today_is_not_at_risk() {
        let status =
            calculate_streak_status_with_jokers("ava", &run("ava", 1, 4), &[day(5)], day(5))
                .unwrap();
        assert_eq!(status.current_streak, 4);
        assert!(!status.is_active_today);
        assert!(!status.risk_of_break);
    }

    #[test]
    fn duplicate_day_is_rejected() {
        let history = vec![active("ava", 3), active("ava", 3)];
        let err = calculate_streak_status("ava", &history, day(3)).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateActivityDay { .. }));
    }

    #[test]
    fn foreign_record_is_rejected() {
        let history = vec![active("ava", 3), active("ben", 4)];
        let err = calculate_streak_status("ava", &history, day(4)).unwrap_err();
        assert!(matches!(err, EngineError::ForeignActivity { .. }));
    }

    #[test]
    fn inactive_records_only_yield_zero() {
        let history = vec![
            DailyActivity::inactive("ava", day(1)),
            DailyActivity::inactive("ava", day(2)),
        ];
        let status = calculate_streak_status("ava", &history, day(2)).unwrap();
        assert_eq!(status.current_streak, 0);
        assert_eq!(status.total_days_active, 0);
        assert_eq!(status.last_active_date, None);
    }
}
