//! Achievement engine
//!
//! Tracks progress toward the fixed achievement catalog and maps the
//! accumulated points onto the tier ladder.

mod catalog;
mod progress;
mod tier;

use serde::{Deserialize, Serialize};

pub use catalog::{achievement_catalog, AchievementDefinition, AchievementId, AchievementMetric};
pub use progress::{
    update_achievement_progress, update_achievements_from_stats, AchievementProgress,
    AchievementStats, AchievementUnlocked, BatchProgressUpdate, ProgressUpdate, UserAchievements,
};
pub use tier::{
    get_points_to_next_tier, get_user_tier, tier_progress, Tier, TierProgress, TierThresholds,
};

/// Configuration for achievements and tiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementConfig {
    #[serde(default)]
    pub tiers: TierThresholds,
}
