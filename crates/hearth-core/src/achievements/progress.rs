//! Achievement progress tracking.
//!
//! Progress is a ratchet: a lower value than the one on record (e.g. after
//! a data correction) leaves the stored progress alone, and points are
//! awarded only on the transition to 100%.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{AchievementId, AchievementMetric};

/// Progress toward one achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub achievement_id: AchievementId,
    pub current_value: f64,
    /// 0-100, capped
    pub percentage: f64,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementProgress {
    fn new(achievement_id: AchievementId) -> Self {
        Self {
            achievement_id,
            current_value: 0.0,
            percentage: 0.0,
            unlocked_at: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// A user's achievement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievements {
    pub user_id: String,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub progress: Vec<AchievementProgress>,
}

impl UserAchievements {
    /// Fresh state with one zeroed entry per catalog achievement.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_points: 0,
            progress: AchievementId::ALL
                .iter()
                .map(|id| AchievementProgress::new(*id))
                .collect(),
        }
    }

    /// Copy with exactly one entry per catalog achievement, in catalog order.
    ///
    /// Missing entries are added zeroed. If a stored snapshot holds the same
    /// achievement twice, the more advanced entry wins.
    pub fn normalized(&self) -> Self {
        let progress = AchievementId::ALL
            .iter()
            .map(|id| {
                self.progress
                    .iter()
                    .filter(|p| p.achievement_id == *id)
                    .max_by(|a, b| {
                        a.is_unlocked()
                            .cmp(&b.is_unlocked())
                            .then(a.percentage.total_cmp(&b.percentage))
                    })
                    .cloned()
                    .unwrap_or_else(|| AchievementProgress::new(*id))
            })
            .collect();

        Self {
            user_id: self.user_id.clone(),
            total_points: self.total_points,
            progress,
        }
    }

    pub fn progress_for(&self, id: AchievementId) -> Option<&AchievementProgress> {
        self.progress.iter().find(|p| p.achievement_id == id)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.progress_for(id).is_some_and(|p| p.is_unlocked())
    }

    pub fn unlocked_count(&self) -> u32 {
        self.progress.iter().filter(|p| p.is_unlocked()).count() as u32
    }
}

/// Aggregated statistics an achievement update reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementStats {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub tasks_completed: u32,
    #[serde(default)]
    pub critical_tasks: u32,
    #[serde(default)]
    pub days_active: u32,
    #[serde(default)]
    pub balance_score: f64,
}

impl AchievementStats {
    pub fn value_for(&self, metric: AchievementMetric) -> f64 {
        match metric {
            AchievementMetric::CurrentStreak => f64::from(self.current_streak),
            AchievementMetric::LongestStreak => f64::from(self.longest_streak),
            AchievementMetric::TasksCompleted => f64::from(self.tasks_completed),
            AchievementMetric::CriticalTasks => f64::from(self.critical_tasks),
            AchievementMetric::DaysActive => f64::from(self.days_active),
            AchievementMetric::BalanceScore => self.balance_score,
        }
    }
}

/// Payload for a newly unlocked achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementUnlocked {
    pub achievement_id: AchievementId,
    pub name: String,
    pub description: String,
    pub points: u32,
    pub unlocked_at: DateTime<Utc>,
    /// User's total after the award
    pub total_points: u32,
}

/// Result of updating a single achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub achievements: UserAchievements,
    pub notification: Option<AchievementUnlocked>,
    /// False when the stored progress was left as it was
    pub changed: bool,
}

/// Result of updating every achievement from a stats snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgressUpdate {
    pub achievements: UserAchievements,
    /// Unlocks in catalog order
    pub notifications: Vec<AchievementUnlocked>,
}

/// Record a new raw value for one achievement.
pub fn update_achievement_progress(
    achievements: &UserAchievements,
    achievement_id: AchievementId,
    new_value: f64,
    now: DateTime<Utc>,
) -> ProgressUpdate {
    let mut updated = achievements.normalized();
    let notification = apply_value(&mut updated, achievement_id, new_value, now);
    let changed = updated != achievements.normalized();

    ProgressUpdate {
        achievements: updated,
        notification,
        changed,
    }
}

/// Update every catalog achievement from one stats snapshot.
pub fn update_achievements_from_stats(
    achievements: &UserAchievements,
    stats: &AchievementStats,
    now: DateTime<Utc>,
) -> BatchProgressUpdate {
    let mut updated = achievements.normalized();
    let notifications = AchievementId::ALL
        .iter()
        .filter_map(|id| {
            let value = stats.value_for(id.definition().metric);
            apply_value(&mut updated, *id, value, now)
        })
        .collect();

    BatchProgressUpdate {
        achievements: updated,
        notifications,
    }
}

/// Apply a value to normalized state, returning the unlock if one happened.
fn apply_value(
    state: &mut UserAchievements,
    achievement_id: AchievementId,
    new_value: f64,
    now: DateTime<Utc>,
) -> Option<AchievementUnlocked> {
    let definition = achievement_id.definition();
    let entry = state
        .progress
        .iter_mut()
        .find(|p| p.achievement_id == achievement_id)?;

    if entry.is_unlocked() || !new_value.is_finite() || new_value <= entry.current_value {
        return None;
    }

    let percentage = (new_value / definition.threshold * 100.0).clamp(0.0, 100.0);
    entry.current_value = new_value;
    entry.percentage = entry.percentage.max(percentage);

    if entry.percentage < 100.0 {
        return None;
    }

    entry.unlocked_at = Some(now);
    state.total_points = state.total_points.saturating_add(definition.points);

    tracing::info!(
        "{} unlocked '{}' (+{} points)",
        state.user_id,
        definition.name,
        definition.points
    );

    Some(AchievementUnlocked {
        achievement_id,
        name: definition.name.to_string(),
        description: definition.description.to_string(),
        points: definition.points,
        unlocked_at: now,
        total_points: state.total_points,
    })
}
