//! Joker system.
//!
//! A joker lets a user skip one inactive day without losing their streak.
//! Standard jokers arrive monthly; golden jokers are earned at long-streak
//! milestones and are spent only after the standard ones run out.

mod inventory;
mod token;

use serde::{Deserialize, Serialize};

pub use inventory::{
    add_joker_to_inventory, allocate_monthly_jokers, check_golden_joker_reward,
    cleanup_expired_jokers, get_best_joker_to_use, grant_golden_joker, use_joker, AddOutcome,
    AllocationOutcome, CleanupOutcome, GoldenJokerOutcome, JokerInventory, JokerUseOutcome,
};
pub(crate) use inventory::spend_for_dates;
pub use token::{JokerSource, JokerToken, JokerType};

/// Configuration for the joker economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerConfig {
    /// Standard jokers granted per calendar month
    #[serde(default = "default_monthly_allocation")]
    pub monthly_allocation: u32,
    /// Extra monthly jokers for premium households
    #[serde(default = "default_premium_bonus")]
    pub premium_bonus: u32,
    /// Maximum unused jokers a user may hold
    #[serde(default = "default_max_storable")]
    pub max_storable: u32,
    /// Lifetime of a standard joker in days; 0 means it never expires
    #[serde(default = "default_standard_expiry_days")]
    pub standard_expiry_days: u32,
    /// A golden joker is awarded at every multiple of this streak length
    #[serde(default = "default_golden_interval_days")]
    pub golden_interval_days: u32,
    /// Spend a joker automatically when a streak is at risk at day end
    #[serde(default = "default_true")]
    pub auto_use: bool,
}

fn default_monthly_allocation() -> u32 {
    2
}
fn default_premium_bonus() -> u32 {
    1
}
fn default_max_storable() -> u32 {
    5
}
fn default_standard_expiry_days() -> u32 {
    90
}
fn default_golden_interval_days() -> u32 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for JokerConfig {
    fn default() -> Self {
        Self {
            monthly_allocation: default_monthly_allocation(),
            premium_bonus: default_premium_bonus(),
            max_storable: default_max_storable(),
            standard_expiry_days: default_standard_expiry_days(),
            golden_interval_days: default_golden_interval_days(),
            auto_use: true,
        }
    }
}
