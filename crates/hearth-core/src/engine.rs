//! Daily Gamification Processor
//!
//! Ties the streak, joker and achievement engines together for the
//! once-per-user-per-day evaluation (or an intraday re-evaluation after a
//! task completes).
//!
//! ## Flow
//!
//! 1. Drop expired jokers
//! 2. Grant the monthly jokers if the allocation window is open
//! 3. If yesterday was missed while the streak was alive, spend a joker on it
//! 4. Recompute the streak with joker-bridged days
//! 5. Detect a break against the previous status
//! 6. Award streak points, milestones and golden jokers
//! 7. Update achievement progress and the tier
//!
//! ## Usage
//!
//! ```ignore
//! let engine = GamificationEngine::new();
//! let outcome = engine.process_day(&input)?;
//! persist(outcome.inventory, outcome.achievements);
//! notify(outcome.notifications);
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::{
    get_user_tier, tier_progress, update_achievements_from_stats, AchievementStats,
    AchievementUnlocked, Tier, TierProgress, UserAchievements,
};
use crate::config::EngineConfig;
use crate::error::{Result, ValidationError};
use crate::joker::{
    allocate_monthly_jokers, cleanup_expired_jokers, grant_golden_joker, spend_for_dates,
    JokerInventory, JokerType,
};
use crate::leaderboard::{generate_family_leaderboard, FamilyLeaderboard, LeaderboardRequest};
use crate::streak::{
    calculate_household_streak, calculate_streak_points, calculate_streak_status_with_jokers,
    can_recover_streak, check_milestone_reached, detect_streak_break_with_jokers,
    get_streak_milestone, milestone_label, DailyActivity, HouseholdStreak, MemberActivity,
    StreakBreak, StreakMilestone, StreakPoints, StreakStatus,
};

/// Everything known about one user for the day being processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyInput {
    pub user_id: String,
    pub now: DateTime<Utc>,
    /// Full activity history, one record per day
    #[serde(default)]
    pub activities: Vec<DailyActivity>,
    /// Status returned by the previous run, used for break and point deltas
    #[serde(default)]
    pub previous_status: Option<StreakStatus>,
    /// Stored inventory; a fresh one is used when absent
    #[serde(default)]
    pub inventory: Option<JokerInventory>,
    /// Stored achievement state; a fresh one is used when absent
    #[serde(default)]
    pub achievements: Option<UserAchievements>,
    /// Task totals and balance score from the task domain. Streak and
    /// active-day figures are taken from the recomputed status.
    #[serde(default)]
    pub stats: AchievementStats,
    #[serde(default)]
    pub is_premium: bool,
}

/// User-facing events produced while processing a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    MilestoneReached {
        milestone: u32,
        label: String,
        bonus_points: u32,
    },
    StreakBroken {
        lost_streak: u32,
        recovery_deadline: DateTime<Utc>,
        recoverable: bool,
    },
    StreakAtRisk {
        current_streak: u32,
        jokers_available: u32,
    },
    JokerUsed {
        covered_date: NaiveDate,
        joker_type: JokerType,
        streak_preserved: u32,
    },
    JokersAllocated {
        count: u32,
        next_allocation_date: Option<NaiveDate>,
    },
    GoldenJokerAwarded {
        milestone: u32,
    },
    JokersExpired {
        count: u32,
    },
    AchievementUnlocked(AchievementUnlocked),
    TierChanged {
        from: Tier,
        to: Tier,
    },
}

/// New state to persist, plus notifications to forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOutcome {
    pub status: StreakStatus,
    pub inventory: JokerInventory,
    pub achievements: UserAchievements,
    pub streak_points: StreakPoints,
    pub milestone: StreakMilestone,
    pub streak_break: Option<StreakBreak>,
    pub tier: TierProgress,
    pub notifications: Vec<Notification>,
}

/// Entry point bundling the engine configuration.
#[derive(Debug, Clone, Default)]
pub struct GamificationEngine {
    config: EngineConfig,
}

impl GamificationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one user's day and return the state to persist.
    ///
    /// Re-running with the returned state and the same facts is a no-op:
    /// allocation is gated by date, the auto-joker by the covered date,
    /// points by the before/after streak pair and unlocks by `unlocked_at`.
    pub fn process_day(&self, input: &DailyInput) -> Result<DailyOutcome> {
        let user_id = input.user_id.as_str();
        let now = input.now;
        let today = now.date_naive();

        let inventory = match &input.inventory {
            Some(inv) => {
                ensure_owner("inventory.user_id", &inv.user_id, user_id)?;
                inv.clone()
            }
            None => JokerInventory::new(user_id),
        };
        let achievements = match &input.achievements {
            Some(ua) => {
                ensure_owner("achievements.user_id", &ua.user_id, user_id)?;
                ua.clone()
            }
            None => UserAchievements::new(user_id),
        };
        if let Some(prev) = &input.previous_status {
            ensure_owner("previous_status.user_id", &prev.user_id, user_id)?;
        }

        let mut notifications = Vec::new();

        let cleanup = cleanup_expired_jokers(&inventory, now);
        if !cleanup.removed.is_empty() {
            notifications.push(Notification::JokersExpired {
                count: cleanup.removed.len() as u32,
            });
        }

        let allocation =
            allocate_monthly_jokers(&cleanup.inventory, input.is_premium, now, &self.config.jokers);
        if allocation.allocated && !allocation.granted.is_empty() {
            notifications.push(Notification::JokersAllocated {
                count: allocation.granted.len() as u32,
                next_allocation_date: allocation.next_allocation_date,
            });
        }
        let mut inventory = allocation.inventory;

        if self.config.jokers.auto_use {
            if let Some(yesterday) = today.pred_opt() {
                let before = calculate_streak_status_with_jokers(
                    user_id,
                    &input.activities,
                    &inventory.covered_dates(),
                    yesterday,
                )?;
                if before.risk_of_break {
                    if let Some((updated, spent)) = spend_for_dates(&inventory, &[yesterday], now) {
                        inventory = updated;
                        tracing::info!(
                            "Auto-used a joker for {} on {} ({}-day streak)",
                            user_id,
                            yesterday,
                            before.current_streak
                        );
                        notifications.extend(spent.iter().map(|token| Notification::JokerUsed {
                            covered_date: yesterday,
                            joker_type: token.joker_type,
                            streak_preserved: before.current_streak,
                        }));
                    }
                }
            }
        }

        let covered = inventory.covered_dates();
        let status =
            calculate_streak_status_with_jokers(user_id, &input.activities, &covered, today)?;

        let streak_break = input.previous_status.as_ref().and_then(|prev| {
            detect_streak_break_with_jokers(prev, &status, &covered, &self.config.streak)
        });
        if let Some(brk) = &streak_break {
            let eligibility = can_recover_streak(brk, now, &self.config.streak);
            notifications.push(Notification::StreakBroken {
                lost_streak: brk.lost_streak,
                recovery_deadline: brk.recovery_deadline,
                recoverable: eligibility.eligible,
            });
        }

        if status.risk_of_break {
            notifications.push(Notification::StreakAtRisk {
                current_streak: status.current_streak,
                jokers_available: inventory.usable_count(now) as u32,
            });
        }

        let previous_streak = input
            .previous_status
            .as_ref()
            .map_or(0, |prev| prev.current_streak);
        let streak_points =
            calculate_streak_points(previous_streak, status.current_streak, &self.config.streak);
        if let Some(milestone) = check_milestone_reached(
            previous_streak,
            status.current_streak,
            &self.config.streak.milestones,
        ) {
            notifications.push(Notification::MilestoneReached {
                milestone,
                label: milestone_label(milestone),
                bonus_points: streak_points.milestone_bonus,
            });
        }

        let golden = grant_golden_joker(
            &inventory,
            previous_streak,
            status.current_streak,
            status.streak_start_date,
            now,
            &self.config.jokers,
        );
        if golden.awarded {
            if let Some(milestone) = golden.milestone {
                notifications.push(Notification::GoldenJokerAwarded { milestone });
            }
        }
        let inventory = golden.inventory;

        let stats = AchievementStats {
            current_streak: status.current_streak,
            longest_streak: status.longest_streak.max(input.stats.longest_streak),
            days_active: status.total_days_active.max(input.stats.days_active),
            ..input.stats.clone()
        };
        let tier_before = get_user_tier(achievements.total_points, &self.config.achievements.tiers);
        let batch = update_achievements_from_stats(&achievements, &stats, now);
        notifications.extend(
            batch
                .notifications
                .into_iter()
                .map(Notification::AchievementUnlocked),
        );

        let tier = tier_progress(batch.achievements.total_points, &self.config.achievements.tiers);
        if tier.tier != tier_before {
            tracing::info!("{} moved from {:?} to {:?}", user_id, tier_before, tier.tier);
            notifications.push(Notification::TierChanged {
                from: tier_before,
                to: tier.tier,
            });
        }

        Ok(DailyOutcome {
            milestone: get_streak_milestone(status.current_streak, &self.config.streak.milestones),
            status,
            inventory,
            achievements: batch.achievements,
            streak_points,
            streak_break,
            tier,
            notifications,
        })
    }

    /// Household streak under the configured policy.
    pub fn household_streak(
        &self,
        household_id: &str,
        members: &[MemberActivity],
        today: NaiveDate,
    ) -> Result<HouseholdStreak> {
        calculate_household_streak(
            household_id,
            members,
            today,
            self.config.streak.household_policy,
        )
    }

    pub fn leaderboard(
        &self,
        request: &LeaderboardRequest,
        now: DateTime<Utc>,
    ) -> Result<FamilyLeaderboard> {
        generate_family_leaderboard(request, now, &self.config.leaderboard)
    }
}

fn ensure_owner(field: &str, found: &str, expected: &str) -> Result<()> {
    if found != expected {
        return Err(ValidationError::invalid(
            field,
            format!("belongs to '{found}', expected '{expected}'"),
        )
        .into());
    }
    Ok(())
}
