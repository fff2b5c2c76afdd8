//! Leaderboard periods.
//!
//! Periods are symbolic and resolved against the caller's "now" on every
//! call; no period boundaries are stored.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardPeriod {
    Day,
    /// ISO week, Monday to Sunday
    Week,
    Month,
    Year,
    AllTime,
}

/// Concrete bounds of a period: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub period: LeaderboardPeriod,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl PeriodRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Resolve a period to the range containing `now`.
pub fn get_period_date_range(period: LeaderboardPeriod, now: DateTime<Utc>) -> PeriodRange {
    let today = now.date_naive();

    let (start, end, label) = match period {
        LeaderboardPeriod::Day => {
            let end = today + Days::new(1);
            (today, end, "Today".to_string())
        }
        LeaderboardPeriod::Week => {
            let start = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
            let end = start + Days::new(7);
            (start, end, format!("Week of {}", start.format("%b %-d, %Y")))
        }
        LeaderboardPeriod::Month => {
            let start = today.with_day(1).unwrap_or(today);
            let end = start + Months::new(1);
            (start, end, start.format("%B %Y").to_string())
        }
        LeaderboardPeriod::Year => {
            let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            let end = start + Months::new(12);
            (start, end, today.year().to_string())
        }
        LeaderboardPeriod::AllTime => {
            return PeriodRange {
                period,
                start: DateTime::<Utc>::UNIX_EPOCH,
                end: now,
                label: "All time".to_string(),
            };
        }
    };

    PeriodRange {
        period,
        start: midnight(start),
        end: midnight(end),
        label,
    }
}

/// The range one cycle before the one containing `now`.
///
/// Used to look up the previous ranking; `None` for all-time boards.
pub fn get_previous_period_range(
    period: LeaderboardPeriod,
    now: DateTime<Utc>,
) -> Option<PeriodRange> {
    if period == LeaderboardPeriod::AllTime {
        return None;
    }
    let current = get_period_date_range(period, now);
    Some(get_period_date_range(period, current.start - Duration::seconds(1)))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
