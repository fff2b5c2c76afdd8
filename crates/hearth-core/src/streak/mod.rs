//! Streak engine.
//!
//! Turns a per-user series of [`DailyActivity`] records into a
//! [`StreakStatus`], detects breaks, evaluates recovery, combines members
//! into a household streak and tracks milestones.

mod activity;
mod household;
mod milestone;
mod recovery;
mod status;

use serde::{Deserialize, Serialize};

pub use activity::{merge_daily_activities, ActivityThreshold, DailyActivity, TaskCompletion};
pub use household::{
    calculate_household_streak, HouseholdStreak, HouseholdStreakPolicy, MemberActivity,
};
pub use milestone::{
    calculate_streak_points, check_milestone_reached, get_streak_milestone, milestone_label,
    StreakMilestone, StreakPoints, DEFAULT_MILESTONES,
};
pub use recovery::{
    attempt_streak_recovery, can_recover_streak, detect_streak_break,
    detect_streak_break_with_jokers, RecoveryEligibility, RecoveryOutcome, StreakBreak,
};
pub use status::{calculate_streak_status, calculate_streak_status_with_jokers, StreakStatus};

/// Configuration for streak behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// What counts as an active day
    #[serde(default)]
    pub activity_threshold: ActivityThreshold,
    /// Hours after a break during which it can still be healed
    #[serde(default = "default_recovery_window_hours")]
    pub recovery_window_hours: u32,
    /// Missed days a single recovery may bridge
    #[serde(default = "default_max_recoverable_days")]
    pub max_recoverable_days: u32,
    /// Ascending milestone ladder (days)
    #[serde(default = "default_milestones")]
    pub milestones: Vec<u32>,
    /// Points per day of streak growth
    #[serde(default = "default_points_per_day")]
    pub points_per_day: u32,
    /// Bonus per milestone day when a milestone is crossed
    #[serde(default = "default_milestone_bonus_per_day")]
    pub milestone_bonus_per_day: u32,
    /// How member streaks combine into a household streak
    #[serde(default)]
    pub household_policy: HouseholdStreakPolicy,
}

fn default_recovery_window_hours() -> u32 {
    48
}
fn default_max_recoverable_days() -> u32 {
    1
}
fn default_milestones() -> Vec<u32> {
    DEFAULT_MILESTONES.to_vec()
}
fn default_points_per_day() -> u32 {
    10
}
fn default_milestone_bonus_per_day() -> u32 {
    5
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            activity_threshold: ActivityThreshold::default(),
            recovery_window_hours: default_recovery_window_hours(),
            max_recoverable_days: default_max_recoverable_days(),
            milestones: default_milestones(),
            points_per_day: default_points_per_day(),
            milestone_bonus_per_day: default_milestone_bonus_per_day(),
            household_policy: HouseholdStreakPolicy::default(),
        }
    }
}
