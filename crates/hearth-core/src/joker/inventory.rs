//! Joker inventory operations.
//!
//! Every operation borrows the current inventory and returns an outcome
//! carrying the new inventory. "No joker left", "already active today" and
//! "inventory full" are ordinary outcomes with a reason string, never
//! errors.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::token::{JokerSource, JokerToken, JokerType};
use super::JokerConfig;
use crate::streak::StreakStatus;

/// Per-user joker holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerInventory {
    pub user_id: String,
    /// Unused tokens in grant order
    #[serde(default)]
    pub available: Vec<JokerToken>,
    /// Spent tokens, kept so bridged days can be replayed
    #[serde(default)]
    pub used: Vec<JokerToken>,
    /// First day the next monthly allocation may happen
    #[serde(default)]
    pub next_allocation_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_granted: u32,
    #[serde(default)]
    pub total_used: u32,
    #[serde(default)]
    pub total_expired: u32,
}

impl JokerInventory {
    /// Empty inventory, eligible for allocation immediately.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            available: Vec::new(),
            used: Vec::new(),
            next_allocation_date: None,
            total_granted: 0,
            total_used: 0,
            total_expired: 0,
        }
    }

    /// Days bridged by spent jokers, ascending.
    pub fn covered_dates(&self) -> Vec<NaiveDate> {
        self.used
            .iter()
            .filter_map(|t| t.covers_date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.used.iter().any(|t| t.covers_date == Some(date))
    }

    /// Tokens that could be spent at `now`.
    pub fn usable_count(&self, now: DateTime<Utc>) -> usize {
        self.available.iter().filter(|t| t.is_usable(now)).count()
    }

    pub fn count_by_type(&self, joker_type: JokerType) -> usize {
        self.available
            .iter()
            .filter(|t| t.joker_type == joker_type)
            .count()
    }

    fn contains_id(&self, id: &str) -> bool {
        self.available.iter().chain(self.used.iter()).any(|t| t.id == id)
    }
}

/// Result of a monthly allocation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub inventory: JokerInventory,
    /// False when the allocation window was already consumed
    pub allocated: bool,
    pub granted: Vec<JokerToken>,
    /// Tokens not granted because the inventory hit `max_storable`
    pub skipped_for_capacity: u32,
    pub next_allocation_date: Option<NaiveDate>,
    pub reason: String,
}

/// Result of adding a single token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOutcome {
    pub inventory: JokerInventory,
    pub added: bool,
    pub reason: Option<String>,
}

/// Result of spending a joker on the current day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokerUseOutcome {
    pub inventory: JokerInventory,
    pub success: bool,
    pub used_joker: Option<JokerToken>,
    /// Streak value protected from reset
    pub streak_preserved: u32,
    pub covered_date: Option<NaiveDate>,
    pub reason: String,
}

/// Result of removing expired tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupOutcome {
    pub inventory: JokerInventory,
    pub removed: Vec<JokerToken>,
}

/// Result of a golden joker check-and-grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenJokerOutcome {
    pub inventory: JokerInventory,
    pub awarded: bool,
    pub milestone: Option<u32>,
    pub token: Option<JokerToken>,
    pub reason: String,
}

/// Grant the monthly standard jokers once per calendar month.
///
/// A second call before `next_allocation_date` is a no-op with
/// `allocated: false`.
pub fn allocate_monthly_jokers(
    inventory: &JokerInventory,
    is_premium: bool,
    now: DateTime<Utc>,
    config: &JokerConfig,
) -> AllocationOutcome {
    let today = now.date_naive();

    if let Some(next) = inventory.next_allocation_date {
        if today < next {
            tracing::debug!(
                "Monthly jokers for {} already allocated; next on {}",
                inventory.user_id,
                next
            );
            return AllocationOutcome {
                inventory: inventory.clone(),
                allocated: false,
                granted: Vec::new(),
                skipped_for_capacity: 0,
                next_allocation_date: Some(next),
                reason: format!("Jokers already allocated this month; next allocation on {next}"),
            };
        }
    }

    let entitled = config.monthly_allocation
        + if is_premium { config.premium_bonus } else { 0 };
    let capacity = (config.max_storable as usize).saturating_sub(inventory.available.len()) as u32;
    let to_grant = entitled.min(capacity);
    let skipped_for_capacity = entitled - to_grant;

    let origin_key = today.format("%Y-%m").to_string();
    let expires_at = (config.standard_expiry_days > 0)
        .then(|| now + Duration::days(i64::from(config.standard_expiry_days)));

    let granted: Vec<JokerToken> = (0..to_grant)
        .map(|ordinal| {
            JokerToken::new(
                &inventory.user_id,
                JokerType::Standard,
                JokerSource::MonthlyAllocation,
                &origin_key,
                ordinal,
                now,
                expires_at,
            )
        })
        .collect();

    let next = first_day_of_next_month(today);
    let mut updated = inventory.clone();
    updated.available.extend(granted.iter().cloned());
    updated.total_granted += to_grant;
    updated.next_allocation_date = Some(next);

    let reason = if skipped_for_capacity > 0 {
        format!(
            "Granted {to_grant} of {entitled} jokers; inventory full (max {})",
            config.max_storable
        )
    } else {
        format!("Granted {to_grant} jokers")
    };

    tracing::info!(
        "Allocated {} monthly jokers to {} ({} skipped for capacity)",
        to_grant,
        inventory.user_id,
        skipped_for_capacity
    );

    AllocationOutcome {
        inventory: updated,
        allocated: true,
        granted,
        skipped_for_capacity,
        next_allocation_date: Some(next),
        reason,
    }
}

/// Add one token, refusing when full or already present.
pub fn add_joker_to_inventory(
    inventory: &JokerInventory,
    token: JokerToken,
    config: &JokerConfig,
) -> AddOutcome {
    let refuse = |reason: String| AddOutcome {
        inventory: inventory.clone(),
        added: false,
        reason: Some(reason),
    };

    if token.user_id != inventory.user_id {
        return refuse(format!(
            "Joker belongs to '{}', not '{}'",
            token.user_id, inventory.user_id
        ));
    }
    if token.is_used() {
        return refuse("Joker has already been used".to_string());
    }
    if inventory.contains_id(&token.id) {
        return refuse("Joker is already in the inventory".to_string());
    }
    if inventory.available.len() >= config.max_storable as usize {
        return refuse(format!(
            "Inventory full (max {} jokers)",
            config.max_storable
        ));
    }

    let mut updated = inventory.clone();
    updated.available.push(token);
    updated.total_granted += 1;

    AddOutcome {
        inventory: updated,
        added: true,
        reason: None,
    }
}

/// Pick the token to spend: standard before golden, oldest first.
///
/// The streak length does not change the choice; it is accepted so callers
/// pass the same context they pass to [`use_joker`].
pub fn get_best_joker_to_use(
    inventory: &JokerInventory,
    _current_streak: u32,
    now: DateTime<Utc>,
) -> Option<&JokerToken> {
    inventory
        .available
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_usable(now))
        .min_by_key(|(index, t)| (t.joker_type, *index))
        .map(|(_, t)| t)
}

/// Spend a joker to protect today's streak.
pub fn use_joker(
    inventory: &JokerInventory,
    status: &StreakStatus,
    now: DateTime<Utc>,
) -> JokerUseOutcome {
    let fail = |reason: String| JokerUseOutcome {
        inventory: inventory.clone(),
        success: false,
        used_joker: None,
        streak_preserved: 0,
        covered_date: None,
        reason,
    };

    if status.user_id != inventory.user_id {
        return fail(format!(
            "Streak of '{}' cannot be protected with jokers of '{}'",
            status.user_id, inventory.user_id
        ));
    }
    if status.is_active_today {
        return fail("Already active today; no joker needed".to_string());
    }
    if inventory.covers(status.as_of) {
        return fail(format!("A joker already covers {}", status.as_of));
    }

    let Some(spent) = spend_for_dates(inventory, &[status.as_of], now) else {
        return fail("No joker available".to_string());
    };
    let (updated, mut tokens) = spent;
    let used_joker = tokens.pop();

    tracing::info!(
        "{} used a joker on {} to keep a {}-day streak",
        status.user_id,
        status.as_of,
        status.current_streak
    );

    JokerUseOutcome {
        inventory: updated,
        success: true,
        used_joker,
        streak_preserved: status.current_streak,
        covered_date: Some(status.as_of),
        reason: format!("Joker used; {}-day streak preserved", status.current_streak),
    }
}

/// Spend one token per date in best-token order.
///
/// Returns `None`, spending nothing, if there are not enough usable tokens.
pub(crate) fn spend_for_dates(
    inventory: &JokerInventory,
    dates: &[NaiveDate],
    now: DateTime<Utc>,
) -> Option<(JokerInventory, Vec<JokerToken>)> {
    if inventory.usable_count(now) < dates.len() {
        return None;
    }

    let mut updated = inventory.clone();
    let mut spent = Vec::with_capacity(dates.len());
    for date in dates {
        let id = get_best_joker_to_use(&updated, 0, now)?.id.clone();
        let position = updated.available.iter().position(|t| t.id == id)?;
        let token = updated.available.remove(position).spent(now, *date);
        updated.used.push(token.clone());
        updated.total_used += 1;
        spent.push(token);
    }
    Some((updated, spent))
}

/// True when a multiple of `interval_days` lies in `(previous, new]`.
pub fn check_golden_joker_reward(previous: u32, new: u32, interval_days: u32) -> bool {
    golden_milestone(previous, new, interval_days).is_some()
}

fn golden_milestone(previous: u32, new: u32, interval_days: u32) -> Option<u32> {
    if interval_days == 0 || new / interval_days <= previous / interval_days {
        return None;
    }
    Some(new / interval_days * interval_days)
}

/// Award a golden joker when the streak crosses a golden milestone.
///
/// The token id is derived from the streak's start date and the milestone,
/// so replaying the same day cannot award it twice.
pub fn grant_golden_joker(
    inventory: &JokerInventory,
    previous: u32,
    new: u32,
    streak_start: Option<NaiveDate>,
    now: DateTime<Utc>,
    config: &JokerConfig,
) -> GoldenJokerOutcome {
    let Some(milestone) = golden_milestone(previous, new, config.golden_interval_days) else {
        return GoldenJokerOutcome {
            inventory: inventory.clone(),
            awarded: false,
            milestone: None,
            token: None,
            reason: "No golden milestone crossed".to_string(),
        };
    };

    let origin_key = match streak_start {
        Some(start) => format!("streak-{start}-{milestone}"),
        None => format!("streak-{milestone}"),
    };
    let token = JokerToken::new(
        &inventory.user_id,
        JokerType::Golden,
        JokerSource::Achievement,
        &origin_key,
        0,
        now,
        None,
    );

    let outcome = add_joker_to_inventory(inventory, token.clone(), config);
    if outcome.added {
        tracing::info!(
            "Golden joker awarded to {} for a {}-day streak",
            inventory.user_id,
            milestone
        );
    }

    GoldenJokerOutcome {
        awarded: outcome.added,
        milestone: Some(milestone),
        token: outcome.added.then_some(token),
        reason: outcome
            .reason
            .unwrap_or_else(|| format!("Golden joker for a {milestone}-day streak")),
        inventory: outcome.inventory,
    }
}

/// Drop expired tokens from `available`; spent tokens stay untouched.
pub fn cleanup_expired_jokers(inventory: &JokerInventory, now: DateTime<Utc>) -> CleanupOutcome {
    let (removed, kept): (Vec<JokerToken>, Vec<JokerToken>) = inventory
        .available
        .iter()
        .cloned()
        .partition(|t| t.is_expired(now));

    if !removed.is_empty() {
        tracing::info!(
            "Removed {} expired jokers from {}",
            removed.len(),
            inventory.user_id
        );
    }

    let mut updated = inventory.clone();
    updated.available = kept;
    updated.total_expired += removed.len() as u32;

    CleanupOutcome {
        inventory: updated,
        removed,
    }
}

fn first_day_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
