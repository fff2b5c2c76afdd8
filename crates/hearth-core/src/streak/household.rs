//! Household-level streaks.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::activity::DailyActivity;
use super::status::{calculate_streak_status_with_jokers, StreakStatus};
use crate::error::{EngineError, Result};

/// How member streaks combine into one household figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdStreakPolicy {
    /// Everyone keeps it going: minimum over active members
    #[default]
    AllActive,
    /// Someone keeps it going: maximum over members
    AnyActive,
    /// Floor of the mean over active members
    Average,
}

impl HouseholdStreakPolicy {
    fn combine(&self, streaks: &[u32]) -> u32 {
        if streaks.is_empty() {
            return 0;
        }
        match self {
            HouseholdStreakPolicy::AllActive => streaks.iter().copied().min().unwrap_or(0),
            HouseholdStreakPolicy::AnyActive => streaks.iter().copied().max().unwrap_or(0),
            HouseholdStreakPolicy::Average => {
                let sum: u64 = streaks.iter().map(|s| u64::from(*s)).sum();
                (sum / streaks.len() as u64) as u32
            }
        }
    }
}

/// One member's history as input to the household calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberActivity {
    pub user_id: String,
    pub activities: Vec<DailyActivity>,
    /// Days bridged by spent jokers
    #[serde(default)]
    pub covered_dates: Vec<NaiveDate>,
}

/// Combined streak for a household, with members reported individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdStreak {
    pub household_id: String,
    pub policy: HouseholdStreakPolicy,
    pub household_streak: u32,
    /// Members with any active day on record
    pub active_members: u32,
    pub members_active_today: u32,
    pub all_active_today: bool,
    /// Per-member statuses, ordered by user id
    pub members: Vec<StreakStatus>,
}

/// Combine member streaks under the given policy.
pub fn calculate_household_streak(
    household_id: &str,
    member_activities: &[MemberActivity],
    today: NaiveDate,
    policy: HouseholdStreakPolicy,
) -> Result<HouseholdStreak> {
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(member_activities.len());

    for member in member_activities {
        if !seen.insert(member.user_id.as_str()) {
            return Err(EngineError::DuplicateMember(member.user_id.clone()));
        }
        members.push(calculate_streak_status_with_jokers(
            &member.user_id,
            &member.activities,
            &member.covered_dates,
            today,
        )?);
    }
    members.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    let active: Vec<&StreakStatus> = members.iter().filter(|m| m.total_days_active > 0).collect();
    let streaks: Vec<u32> = active.iter().map(|m| m.current_streak).collect();
    let members_active_today = members.iter().filter(|m| m.is_active_today).count() as u32;

    Ok(HouseholdStreak {
        household_id: household_id.to_string(),
        policy,
        household_streak: policy.combine(&streaks),
        active_members: active.len() as u32,
        members_active_today,
        all_active_today: !active.is_empty() && active.iter().all(|m| m.is_active_today),
        members,
    })
}
