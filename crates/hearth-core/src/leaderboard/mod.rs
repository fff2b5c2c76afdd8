//! Household leaderboard.
//!
//! A derived, non-persisted view: every call ranks the supplied member
//! statistics from scratch for one scoring dimension and period.

mod period;
mod ranking;
mod scoring;

use serde::{Deserialize, Serialize};

pub use period::{get_period_date_range, get_previous_period_range, LeaderboardPeriod, PeriodRange};
pub use ranking::{
    generate_family_leaderboard, get_rank_change_indicator, FamilyLeaderboard, LeaderboardBadge,
    LeaderboardEntry, LeaderboardRequest, PreviousRank, RankChangeIndicator,
};
pub use scoring::{
    calculate_normalized_score, calculate_percentile, calculate_score, MemberStats,
    ScoringDimension,
};

/// Configuration for leaderboard scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// What one critical task counts as, in ordinary tasks
    #[serde(default = "default_critical_task_multiplier")]
    pub critical_task_multiplier: f64,
    /// Current streak that earns the on-fire badge
    #[serde(default = "default_on_fire_streak")]
    pub on_fire_streak: u32,
}

fn default_critical_task_multiplier() -> f64 {
    2.0
}
fn default_on_fire_streak() -> u32 {
    7
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            critical_task_multiplier: default_critical_task_multiplier(),
            on_fire_streak: default_on_fire_streak(),
        }
    }
}
