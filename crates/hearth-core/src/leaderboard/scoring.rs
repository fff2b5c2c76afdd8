//! Per-dimension scoring and distribution helpers.

use serde::{Deserialize, Serialize};

use super::LeaderboardConfig;

/// Scalar a leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringDimension {
    #[default]
    Points,
    Streak,
    Tasks,
    /// Composite of the three raw dimensions, comparable across households
    Normalized,
}

/// Aggregated statistics for one household member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberStats {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub tasks_completed: u32,
    #[serde(default)]
    pub critical_tasks: u32,
    #[serde(default)]
    pub achievements_unlocked: u32,
}

fn raw_score(stats: &MemberStats, dimension: ScoringDimension, config: &LeaderboardConfig) -> f64 {
    match dimension {
        ScoringDimension::Points | ScoringDimension::Normalized => f64::from(stats.total_points),
        ScoringDimension::Streak => f64::from(stats.current_streak),
        ScoringDimension::Tasks => {
            f64::from(stats.tasks_completed)
                + f64::from(stats.critical_tasks) * (config.critical_task_multiplier - 1.0)
        }
    }
}

/// Score one member on a dimension.
///
/// `household` is the distribution used by [`ScoringDimension::Normalized`];
/// the raw dimensions ignore it. The normalized score is a T-score
/// (`50 + 10 * z`) of the member's mean z-score over points, streak and
/// tasks, so an average member scores 50.
pub fn calculate_score(
    stats: &MemberStats,
    dimension: ScoringDimension,
    household: &[MemberStats],
    config: &LeaderboardConfig,
) -> f64 {
    if dimension != ScoringDimension::Normalized {
        return raw_score(stats, dimension, config);
    }

    let raw = [
        ScoringDimension::Points,
        ScoringDimension::Streak,
        ScoringDimension::Tasks,
    ];
    let mean_z = raw
        .iter()
        .map(|dim| {
            let population: Vec<f64> = household
                .iter()
                .map(|member| raw_score(member, *dim, config))
                .collect();
            calculate_normalized_score(raw_score(stats, *dim, config), &population)
        })
        .sum::<f64>()
        / raw.len() as f64;

    50.0 + 10.0 * mean_z
}

/// z-score of `value` within `population`.
///
/// Returns 0 for an empty population or one without spread.
pub fn calculate_normalized_score(value: f64, population: &[f64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let n = population.len() as f64;
    let mean = population.iter().sum::<f64>() / n;
    let variance = population.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev < f64::EPSILON {
        return 0.0;
    }
    (value - mean) / std_dev
}

/// Percentage of the other members scoring strictly below `score`.
///
/// `population` includes the member being placed. A lone member (or an
/// empty population) sits at 100.
pub fn calculate_percentile(score: f64, population: &[f64]) -> f64 {
    if population.len() <= 1 {
        return 100.0;
    }
    let below = population.iter().filter(|s| **s < score).count();
    below as f64 / (population.len() - 1) as f64 * 100.0
}
