//! Daily activity records.
//!
//! A [`DailyActivity`] is the per-user, per-day rollup the streak engine
//! reads. Records for past days are immutable; today's record is rebuilt
//! from the growing list of completions as tasks are finished.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Minimum activity a day needs to count toward a streak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityThreshold {
    /// Completed tasks required (a value of 0 is treated as 1)
    #[serde(default = "default_min_tasks")]
    pub min_tasks: u32,
    /// Total weighted load required
    #[serde(default)]
    pub min_weight: f64,
}

fn default_min_tasks() -> u32 {
    1
}

impl Default for ActivityThreshold {
    fn default() -> Self {
        Self {
            min_tasks: default_min_tasks(),
            min_weight: 0.0,
        }
    }
}

impl ActivityThreshold {
    /// Tasks needed, never below one qualifying completion.
    pub fn tasks_needed(&self) -> u32 {
        self.min_tasks.max(1)
    }

    pub fn is_met(&self, tasks_completed: u32, total_weight: f64) -> bool {
        tasks_completed >= self.tasks_needed() && total_weight >= self.min_weight
    }
}

/// A single completed task as reported by the task domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task_id: String,
    pub completed_at: DateTime<Utc>,
    /// Weighted load of the task (effort points)
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub is_critical: bool,
}

fn default_weight() -> f64 {
    1.0
}

/// One record per (user, calendar day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub user_id: String,
    pub date: NaiveDate,
    pub tasks_completed: u32,
    pub critical_tasks: u32,
    pub total_weight: f64,
    /// True iff the day met the activity threshold
    pub was_active_day: bool,
}

impl DailyActivity {
    /// Build a record, deriving `was_active_day` from the threshold.
    pub fn new(
        user_id: impl Into<String>,
        date: NaiveDate,
        tasks_completed: u32,
        critical_tasks: u32,
        total_weight: f64,
        threshold: &ActivityThreshold,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            tasks_completed,
            critical_tasks,
            total_weight,
            was_active_day: threshold.is_met(tasks_completed, total_weight),
        }
    }

    /// A day with nothing completed.
    pub fn inactive(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            tasks_completed: 0,
            critical_tasks: 0,
            total_weight: 0.0,
            was_active_day: false,
        }
    }

    /// Roll up the completions that fall on `date` (UTC calendar day).
    ///
    /// Completions from other days are ignored, so the caller can pass a
    /// rolling window of recent completions when recomputing today.
    pub fn summarize(
        user_id: impl Into<String>,
        date: NaiveDate,
        completions: &[TaskCompletion],
        threshold: &ActivityThreshold,
    ) -> Self {
        let mut tasks = 0u32;
        let mut critical = 0u32;
        let mut weight = 0.0;

        for completion in completions
            .iter()
            .filter(|c| c.completed_at.date_naive() == date)
        {
            tasks += 1;
            if completion.is_critical {
                critical += 1;
            }
            weight += completion.weight.max(0.0);
        }

        Self::new(user_id, date, tasks, critical, weight, threshold)
    }

    /// Tasks still missing before the day counts as active.
    pub fn remaining_tasks(&self, threshold: &ActivityThreshold) -> u32 {
        threshold.tasks_needed().saturating_sub(self.tasks_completed)
    }

    /// Weighted load still missing before the day counts as active.
    pub fn remaining_weight(&self, threshold: &ActivityThreshold) -> f64 {
        (threshold.min_weight - self.total_weight).max(0.0)
    }
}

/// Merge duplicate (user, day) records into one record each.
///
/// The streak engine rejects duplicate days; callers that store one row
/// per completion batch use this to pre-merge. Output is ordered by user,
/// then date.
pub fn merge_daily_activities(
    records: &[DailyActivity],
    threshold: &ActivityThreshold,
) -> Vec<DailyActivity> {
    let mut merged: BTreeMap<(String, NaiveDate), (u32, u32, f64)> = BTreeMap::new();

    for record in records {
        let entry = merged
            .entry((record.user_id.clone(), record.date))
            .or_insert((0, 0, 0.0));
        entry.0 += record.tasks_completed;
        entry.1 += record.critical_tasks;
        entry.2 += record.total_weight;
    }

    merged
        .into_iter()
        .map(|((user_id, date), (tasks, critical, weight))| {
            DailyActivity::new(user_id, date, tasks, critical, weight, threshold)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn completion(id: &str, d: u32, hour: u32, weight: f64, critical: bool) -> TaskCompletion {
        TaskCompletion {
            task_id: id.to_string(),
            completed_at: Utc.with_ymd_and_hms(2026, 5, d, hour, 0, 0).unwrap(),
            weight,
            is_critical: critical,
        }
    }

    #[test]
    fn zero_min_tasks_still_needs_one_completion() {
        let threshold = ActivityThreshold {
            min_tasks: 0,
            min_weight: 0.0,
        };
        assert!(!threshold.is_met(0, 0.0));
        assert!(threshold.is_met(1, 0.0));
    }

    #[test]
    fn summarize_counts_only_matching_day() {
        let completions = vec![
            completion("dishes", 3, 8, 2.0, false),
            completion("trash", 3, 19, 1.0, true),
            completion("laundry", 4, 9, 3.0, false),
        ];
        let record =
            DailyActivity::summarize("ava", day(3), &completions, &ActivityThreshold::default());

        assert_eq!(record.tasks_completed, 2);
        assert_eq!(record.critical_tasks, 1);
        assert_eq!(record.total_weight, 3.0);
        assert!(record.was_active_day);
    }

    #[test]
    fn weight_threshold_gates_active_flag() {
        let threshold = ActivityThreshold {
            min_tasks: 1,
            min_weight: 5.0,
        };
        let completions = vec![completion("dishes", 3, 8, 2.0, false)];
        let record = DailyActivity::summarize("ava", day(3), &completions, &threshold);

        assert!(!record.was_active_day);
        assert_eq!(record.remaining_tasks(&threshold), 0);
        assert_eq!(record.remaining_weight(&threshold), 3.0);
    }

    #[test]
    fn merge_sums_same_day_records() {
        let threshold = ActivityThreshold::default();
        let records = vec![
            DailyActivity::new("ava", day(3), 1, 0, 1.0, &threshold),
            DailyActivity::new("ava", day(3), 2, 1, 4.0, &threshold),
            DailyActivity::inactive("ava", day(2)),
            DailyActivity::new("ben", day(3), 1, 0, 1.0, &threshold),
        ];

        let merged = merge_daily_activities(&records, &threshold);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].date, day(2));
        assert_eq!(merged[1].tasks_completed, 3);
        assert_eq!(merged[1].critical_tasks, 1);
        assert_eq!(merged[1].total_weight, 5.0);
        assert_eq!(merged[2].user_id, "ben");
    }
}
