//! Fixed achievement catalog.
//!
//! Achievements are a closed enum; adding one means adding a variant and
//! its definition below, so the compiler checks every lookup.

use serde::{Deserialize, Serialize};

/// Statistic an achievement tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementMetric {
    CurrentStreak,
    LongestStreak,
    TasksCompleted,
    CriticalTasks,
    DaysActive,
    /// Share-of-load fairness score (0-100) from the task domain
    BalanceScore,
}

/// Every achievement a user can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstTask,
    TaskRookie,
    TaskRegular,
    TaskCenturion,
    TaskLegend,
    StreakStarter,
    WeekWarrior,
    FortnightFocus,
    MonthlyMaster,
    StreakCentury,
    /// Kept after a break: tracks the longest run
    Seasoned,
    CriticalHelper,
    CriticalHero,
    Dedicated,
    Veteran,
    FairShare,
    PerfectBalance,
}

/// Static description of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub metric: AchievementMetric,
    pub threshold: f64,
    pub points: u32,
    pub name: &'static str,
    pub description: &'static str,
}

impl AchievementId {
    /// Catalog order; batch updates report unlocks in this order.
    pub const ALL: [AchievementId; 17] = [
        AchievementId::FirstTask,
        AchievementId::TaskRookie,
        AchievementId::TaskRegular,
        AchievementId::TaskCenturion,
        AchievementId::TaskLegend,
        AchievementId::StreakStarter,
        AchievementId::WeekWarrior,
        AchievementId::FortnightFocus,
        AchievementId::MonthlyMaster,
        AchievementId::StreakCentury,
        AchievementId::Seasoned,
        AchievementId::CriticalHelper,
        AchievementId::CriticalHero,
        AchievementId::Dedicated,
        AchievementId::Veteran,
        AchievementId::FairShare,
        AchievementId::PerfectBalance,
    ];

    pub fn definition(&self) -> AchievementDefinition {
        use AchievementMetric::*;

        let (metric, threshold, points, name, description) = match self {
            AchievementId::FirstTask => {
                (TasksCompleted, 1.0, 10, "First Steps", "Complete your first task")
            }
            AchievementId::TaskRookie => {
                (TasksCompleted, 10.0, 25, "Helping Hand", "Complete 10 tasks")
            }
            AchievementId::TaskRegular => {
                (TasksCompleted, 50.0, 50, "House Regular", "Complete 50 tasks")
            }
            AchievementId::TaskCenturion => {
                (TasksCompleted, 100.0, 100, "Centurion", "Complete 100 tasks")
            }
            AchievementId::TaskLegend => {
                (TasksCompleted, 500.0, 250, "Household Legend", "Complete 500 tasks")
            }
            AchievementId::StreakStarter => {
                (CurrentStreak, 3.0, 15, "On a Roll", "Reach a 3-day streak")
            }
            AchievementId::WeekWarrior => {
                (CurrentStreak, 7.0, 30, "Week Warrior", "Reach a 7-day streak")
            }
            AchievementId::FortnightFocus => {
                (CurrentStreak, 14.0, 60, "Fortnight Focus", "Reach a 14-day streak")
            }
            AchievementId::MonthlyMaster => {
                (CurrentStreak, 30.0, 120, "Monthly Master", "Reach a 30-day streak")
            }
            AchievementId::StreakCentury => {
                (CurrentStreak, 100.0, 400, "Unstoppable", "Reach a 100-day streak")
            }
            AchievementId::Seasoned => {
                (LongestStreak, 60.0, 90, "Seasoned", "Have a 60-day streak on record")
            }
            AchievementId::CriticalHelper => {
                (CriticalTasks, 10.0, 40, "Clutch Helper", "Complete 10 critical tasks")
            }
            AchievementId::CriticalHero => {
                (CriticalTasks, 50.0, 150, "Clutch Hero", "Complete 50 critical tasks")
            }
            AchievementId::Dedicated => (DaysActive, 30.0, 75, "Dedicated", "Be active on 30 days"),
            AchievementId::Veteran => (DaysActive, 100.0, 200, "Veteran", "Be active on 100 days"),
            AchievementId::FairShare => {
                (BalanceScore, 70.0, 50, "Fair Share", "Reach a balance score of 70")
            }
            AchievementId::PerfectBalance => {
                (BalanceScore, 90.0, 100, "Perfect Balance", "Reach a balance score of 90")
            }
        };

        AchievementDefinition {
            id: *self,
            metric,
            threshold,
            points,
            name,
            description,
        }
    }
}

/// All definitions in catalog order.
pub fn achievement_catalog() -> Vec<AchievementDefinition> {
    AchievementId::ALL.iter().map(|id| id.definition()).collect()
}
