//! Streak milestones and streak points.
//!
//! Everything here is a pure function of a before/after streak pair, so
//! re-running a day never awards the same bonus twice.

use serde::{Deserialize, Serialize};

use super::StreakConfig;

/// Default milestone ladder in days.
pub const DEFAULT_MILESTONES: [u32; 8] = [3, 7, 14, 30, 60, 100, 180, 365];

/// Where a streak sits on the milestone ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakMilestone {
    /// Highest milestone already reached
    pub reached: Option<u32>,
    /// Next milestone ahead, `None` past the top of the ladder
    pub next: Option<u32>,
    pub days_to_next: Option<u32>,
    /// Progress from the reached milestone toward the next one (0-100)
    pub progress_percent: f64,
    pub label: String,
}

/// Points earned by moving from one streak value to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPoints {
    pub daily_points: u32,
    pub milestone_bonus: u32,
    pub total_points: u32,
    /// Milestones crossed in ascending order
    pub milestones_crossed: Vec<u32>,
}

/// Locate a streak on the ladder.
pub fn get_streak_milestone(streak: u32, ladder: &[u32]) -> StreakMilestone {
    let reached = ladder.iter().copied().filter(|m| *m <= streak).max();
    let next = ladder.iter().copied().filter(|m| *m > streak).min();

    let progress_percent = match next {
        Some(next) => {
            let floor = reached.unwrap_or(0);
            let span = (next - floor) as f64;
            ((streak - floor) as f64 / span * 100.0).clamp(0.0, 100.0)
        }
        None => 100.0,
    };

    StreakMilestone {
        reached,
        next,
        days_to_next: next.map(|n| n - streak),
        progress_percent,
        label: reached.map(milestone_label).unwrap_or_else(|| "Getting started".to_string()),
    }
}

/// Highest milestone crossed going from `previous` to `new`, if any.
pub fn check_milestone_reached(previous: u32, new: u32, ladder: &[u32]) -> Option<u32> {
    milestones_between(previous, new, ladder).last().copied()
}

/// Per-day trickle plus a one-time bonus for every milestone crossed.
pub fn calculate_streak_points(previous: u32, new: u32, config: &StreakConfig) -> StreakPoints {
    let gained_days = new.saturating_sub(previous);
    let daily_points = gained_days.saturating_mul(config.points_per_day);
    let milestones_crossed = milestones_between(previous, new, &config.milestones);
    let milestone_bonus = milestones_crossed
        .iter()
        .map(|m| m.saturating_mul(config.milestone_bonus_per_day))
        .fold(0u32, u32::saturating_add);

    StreakPoints {
        daily_points,
        milestone_bonus,
        total_points: daily_points.saturating_add(milestone_bonus),
        milestones_crossed,
    }
}

/// Human-readable name for a milestone.
pub fn milestone_label(days: u32) -> String {
    match days {
        7 => "One week".to_string(),
        14 => "Two weeks".to_string(),
        30 => "One month".to_string(),
        365 => "One year".to_string(),
        d if d % 7 == 0 && d < 60 => format!("{} weeks", d / 7),
        d => format!("{d} days"),
    }
}

fn milestones_between(previous: u32, new: u32, ladder: &[u32]) -> Vec<u32> {
    let mut crossed: Vec<u32> = ladder
        .iter()
        .copied()
        .filter(|m| previous < *m && *m <= new)
        .collect();
    crossed.sort_unstable();
    crossed
}
