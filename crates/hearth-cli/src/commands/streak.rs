use std::path::{Path, PathBuf};

use clap::Subcommand;
use hearth_core::joker::JokerInventory;
use hearth_core::streak::{
    calculate_household_streak, calculate_streak_points, calculate_streak_status_with_jokers,
    can_recover_streak, detect_streak_break_with_jokers, get_streak_milestone,
    HouseholdStreakPolicy, MemberActivity,
};
use hearth_core::{DailyActivity, StreakStatus};
use serde_json::json;

use super::{load_config, parse_date, parse_now, print_json, read_json, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Compute a user's streak status
    Status {
        #[arg(long)]
        user: String,
        /// JSON array of daily activity records
        #[arg(long)]
        activities: PathBuf,
        /// Joker inventory whose spent jokers bridge days
        #[arg(long)]
        inventory: Option<PathBuf>,
        /// Day to evaluate (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<String>,
    },
    /// Combine member streaks into a household streak
    Household {
        #[arg(long)]
        household: String,
        /// JSON array of member activity histories
        #[arg(long)]
        members: PathBuf,
        #[arg(long)]
        today: Option<String>,
        /// Override the configured policy
        #[arg(long, value_parser = parse_policy)]
        policy: Option<HouseholdStreakPolicy>,
    },
    /// Detect a break between two statuses and check recovery
    Break {
        /// Previous status JSON
        #[arg(long)]
        previous: PathBuf,
        /// Current status JSON
        #[arg(long)]
        current: PathBuf,
        #[arg(long)]
        inventory: Option<PathBuf>,
        /// RFC 3339 timestamp (default now)
        #[arg(long)]
        now: Option<String>,
    },
    /// Locate a streak on the milestone ladder
    Milestone {
        streak: u32,
        /// Previous streak, to compute points earned
        #[arg(long)]
        previous: Option<u32>,
    },
}

fn parse_policy(s: &str) -> Result<HouseholdStreakPolicy, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unknown policy '{s}' (all_active, any_active, average)"))
}

fn covered_dates(
    inventory: Option<&Path>,
) -> Result<Vec<chrono::NaiveDate>, Box<dyn std::error::Error>> {
    match inventory {
        Some(path) => Ok(read_json::<JokerInventory>(path)?.covered_dates()),
        None => Ok(Vec::new()),
    }
}

pub fn run(action: StreakAction, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;

    match action {
        StreakAction::Status {
            user,
            activities,
            inventory,
            today,
        } => {
            let activities: Vec<DailyActivity> = read_json(&activities)?;
            let covered = covered_dates(inventory.as_deref())?;
            let today = parse_date(today.as_deref())?;
            let status = calculate_streak_status_with_jokers(&user, &activities, &covered, today)?;
            print_json(&status)
        }
        StreakAction::Household {
            household,
            members,
            today,
            policy,
        } => {
            let members: Vec<MemberActivity> = read_json(&members)?;
            let today = parse_date(today.as_deref())?;
            let policy = policy.unwrap_or(config.streak.household_policy);
            let result = calculate_household_streak(&household, &members, today, policy)?;
            print_json(&result)
        }
        StreakAction::Break {
            previous,
            current,
            inventory,
            now,
        } => {
            let previous: StreakStatus = read_json(&previous)?;
            let current: StreakStatus = read_json(&current)?;
            let covered = covered_dates(inventory.as_deref())?;
            let now = parse_now(now.as_deref())?;

            let streak_break =
                detect_streak_break_with_jokers(&previous, &current, &covered, &config.streak);
            let eligibility = streak_break
                .as_ref()
                .map(|b| can_recover_streak(b, now, &config.streak));
            print_json(&json!({
                "broken": streak_break.is_some(),
                "break": streak_break,
                "eligibility": eligibility,
            }))
        }
        StreakAction::Milestone { streak, previous } => {
            let milestone = get_streak_milestone(streak, &config.streak.milestones);
            let points = previous.map(|prev| calculate_streak_points(prev, streak, &config.streak));
            print_json(&json!({
                "streak": streak,
                "milestone": milestone,
                "points": points,
            }))
        }
    }
}
