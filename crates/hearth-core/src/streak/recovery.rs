//! Streak break detection and recovery.
//!
//! A broken streak can be healed inside a recovery window: the user has to
//! be active today, and every missed day since the last active day is
//! bridged with a joker. Because streaks are always recomputed from
//! history, the spent jokers' covered dates are what make the recovery
//! stick.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityThreshold, DailyActivity};
use super::status::StreakStatus;
use super::StreakConfig;
use crate::joker::{spend_for_dates, JokerInventory, JokerToken};

/// Describes a streak that just broke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakBreak {
    pub user_id: String,
    /// Streak length lost in the break
    pub lost_streak: u32,
    pub last_active_date: NaiveDate,
    /// Uncovered inactive days between the last active day and `detected_on`
    pub missed_dates: Vec<NaiveDate>,
    /// Day the break was detected
    pub detected_on: NaiveDate,
    /// End of the first missed day (UTC midnight)
    pub broken_at: DateTime<Utc>,
    pub recovery_deadline: DateTime<Utc>,
    /// Minimum activity today needed to heal the break
    pub tasks_needed: u32,
    pub weight_needed: f64,
}

impl StreakBreak {
    fn threshold(&self) -> ActivityThreshold {
        ActivityThreshold {
            min_tasks: self.tasks_needed,
            min_weight: self.weight_needed,
        }
    }

    /// Days that must be bridged to recover on `today`.
    ///
    /// Every day from `detected_on` up to yesterday is also missed, since
    /// the break stood through it.
    pub fn outstanding_missed_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = self.missed_dates.clone();
        dates.extend(
            self.detected_on
                .iter_days()
                .take_while(|d| *d < today)
                .filter(|d| !self.missed_dates.contains(d)),
        );
        dates
    }
}

/// Whether a break can still be healed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryEligibility {
    pub eligible: bool,
    pub reason: String,
    /// Minutes left until the deadline, 0 once it passed
    pub time_remaining_minutes: i64,
    pub missed_days: u32,
}

/// Result of a recovery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    pub success: bool,
    /// Streak after recovery, including today
    pub restored_streak: u32,
    pub inventory: JokerInventory,
    pub jokers_used: Vec<JokerToken>,
    pub remaining_tasks: u32,
    pub remaining_weight: f64,
    pub reason: String,
}

/// Detect a break between two consecutive status computations.
///
/// A break is a streak that was alive before, is zero now, and today has
/// not been secured yet.
pub fn detect_streak_break(
    previous: &StreakStatus,
    current: &StreakStatus,
    config: &StreakConfig,
) -> Option<StreakBreak> {
    detect_streak_break_with_jokers(previous, current, &[], config)
}

/// Detect a break where some days after the last active day are already
/// bridged by jokers.
///
/// Covered days are not reported as missed, and the recovery window opens
/// with the first uncovered missed day.
pub fn detect_streak_break_with_jokers(
    previous: &StreakStatus,
    current: &StreakStatus,
    covered_dates: &[NaiveDate],
    config: &StreakConfig,
) -> Option<StreakBreak> {
    if previous.user_id != current.user_id
        || previous.current_streak == 0
        || current.current_streak > 0
        || current.is_active_today
    {
        return None;
    }

    let last_active_date = current.last_active_date.or(previous.last_active_date)?;
    let missed_dates: Vec<NaiveDate> = last_active_date
        .succ_opt()?
        .iter_days()
        .take_while(|d| *d < current.as_of)
        .filter(|d| !covered_dates.contains(d))
        .collect();
    let first_missed = *missed_dates.first()?;

    let broken_at = first_missed.succ_opt()?.and_time(NaiveTime::MIN).and_utc();
    let recovery_deadline =
        broken_at + Duration::hours(i64::from(config.recovery_window_hours));

    tracing::info!(
        "Streak of {} broke: lost {} days, recoverable until {}",
        current.user_id,
        previous.current_streak,
        recovery_deadline
    );

    Some(StreakBreak {
        user_id: current.user_id.clone(),
        lost_streak: previous.current_streak,
        last_active_date,
        missed_dates,
        detected_on: current.as_of,
        broken_at,
        recovery_deadline,
        tasks_needed: config.activity_threshold.tasks_needed(),
        weight_needed: config.activity_threshold.min_weight,
    })
}

/// Check a break against its recovery deadline and gap size.
///
/// The gap is measured up to `now`, so days spent waiting inside the
/// window count as missed too.
pub fn can_recover_streak(
    break_info: &StreakBreak,
    now: DateTime<Utc>,
    config: &StreakConfig,
) -> RecoveryEligibility {
    let missed_days = break_info.outstanding_missed_dates(now.date_naive()).len() as u32;
    let time_remaining_minutes = (break_info.recovery_deadline - now).num_minutes().max(0);

    let (eligible, reason) = if now > break_info.recovery_deadline {
        (false, "Recovery window expired".to_string())
    } else if missed_days > config.max_recoverable_days {
        (
            false,
            format!(
                "Missed {missed_days} days; at most {} can be recovered",
                config.max_recoverable_days
            ),
        )
    } else {
        (
            true,
            format!(
                "Recover your {}-day streak within {} hours",
                break_info.lost_streak,
                time_remaining_minutes / 60
            ),
        )
    };

    RecoveryEligibility {
        eligible,
        reason,
        time_remaining_minutes,
        missed_days,
    }
}

/// Heal a break by being active today and bridging the missed days with
/// jokers.
///
/// On failure the inventory is returned unchanged.
pub fn attempt_streak_recovery(
    break_info: &StreakBreak,
    inventory: &JokerInventory,
    today_activity: Option<&DailyActivity>,
    now: DateTime<Utc>,
    config: &StreakConfig,
) -> RecoveryOutcome {
    let threshold = break_info.threshold();
    let today = now.date_naive();
    let today_record = today_activity
        .filter(|a| a.date == today && a.user_id == break_info.user_id)
        .cloned()
        .unwrap_or_else(|| DailyActivity::inactive(&break_info.user_id, today));
    let remaining_tasks = today_record.remaining_tasks(&threshold);
    let remaining_weight = today_record.remaining_weight(&threshold);

    let fail = |reason: String| RecoveryOutcome {
        success: false,
        restored_streak: 0,
        inventory: inventory.clone(),
        jokers_used: Vec::new(),
        remaining_tasks,
        remaining_weight,
        reason,
    };

    let eligibility = can_recover_streak(break_info, now, config);
    if !eligibility.eligible {
        return fail(eligibility.reason);
    }

    if remaining_tasks > 0 || remaining_weight > 0.0 {
        return fail(format!(
            "Complete {remaining_tasks} more task(s) today to recover your {}-day streak",
            break_info.lost_streak
        ));
    }

    let to_cover: Vec<NaiveDate> = break_info
        .outstanding_missed_dates(today)
        .into_iter()
        .filter(|d| !inventory.covers(*d))
        .collect();

    let Some((updated, jokers_used)) = spend_for_dates(inventory, &to_cover, now) else {
        return fail(format!(
            "Not enough jokers: {} needed, {} available",
            to_cover.len(),
            inventory.usable_count(now)
        ));
    };

    let restored_streak = break_info.lost_streak + 1;
    tracing::info!(
        "{} recovered a {}-day streak using {} joker(s)",
        break_info.user_id,
        break_info.lost_streak,
        jokers_used.len()
    );

    RecoveryOutcome {
        success: true,
        restored_streak,
        inventory: updated,
        jokers_used,
        remaining_tasks: 0,
        remaining_weight: 0.0,
        reason: format!("Streak recovered at {restored_streak} days"),
    }
}
