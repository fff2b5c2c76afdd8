use std::path::{Path, PathBuf};

use clap::Subcommand;
use hearth_core::joker::{
    allocate_monthly_jokers, check_golden_joker_reward, cleanup_expired_jokers, grant_golden_joker,
    use_joker, JokerInventory,
};
use hearth_core::StreakStatus;
use serde_json::json;

use super::{load_config, parse_date, parse_now, print_json, read_json, CliResult};

#[derive(Subcommand)]
pub enum JokerAction {
    /// Grant the monthly jokers if due
    Allocate {
        /// Inventory JSON; a fresh inventory for --user is used when omitted
        #[arg(long)]
        inventory: Option<PathBuf>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        premium: bool,
        #[arg(long)]
        now: Option<String>,
    },
    /// Spend a joker to protect the day of a streak status
    Use {
        #[arg(long)]
        inventory: PathBuf,
        /// Streak status JSON for the day to protect
        #[arg(long)]
        status: PathBuf,
        #[arg(long)]
        now: Option<String>,
    },
    /// Remove expired jokers
    Cleanup {
        #[arg(long)]
        inventory: PathBuf,
        #[arg(long)]
        now: Option<String>,
    },
    /// Check (and with --inventory, grant) a golden joker for a streak change
    Golden {
        previous: u32,
        new: u32,
        #[arg(long)]
        inventory: Option<PathBuf>,
        /// First day of the streak (YYYY-MM-DD)
        #[arg(long)]
        streak_start: Option<String>,
        #[arg(long)]
        now: Option<String>,
    },
}

fn load_inventory(
    path: Option<&Path>,
    user: Option<&str>,
) -> Result<JokerInventory, Box<dyn std::error::Error>> {
    match (path, user) {
        (Some(p), _) => read_json(p),
        (None, Some(u)) => Ok(JokerInventory::new(u)),
        (None, None) => Err("either --inventory or --user is required".into()),
    }
}

pub fn run(action: JokerAction, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;

    match action {
        JokerAction::Allocate {
            inventory,
            user,
            premium,
            now,
        } => {
            let inventory = load_inventory(inventory.as_deref(), user.as_deref())?;
            let now = parse_now(now.as_deref())?;
            print_json(&allocate_monthly_jokers(&inventory, premium, now, &config.jokers))
        }
        JokerAction::Use {
            inventory,
            status,
            now,
        } => {
            let inventory: JokerInventory = read_json(&inventory)?;
            let status: StreakStatus = read_json(&status)?;
            let now = parse_now(now.as_deref())?;
            print_json(&use_joker(&inventory, &status, now))
        }
        JokerAction::Cleanup { inventory, now } => {
            let inventory: JokerInventory = read_json(&inventory)?;
            let now = parse_now(now.as_deref())?;
            print_json(&cleanup_expired_jokers(&inventory, now))
        }
        JokerAction::Golden {
            previous,
            new,
            inventory,
            streak_start,
            now,
        } => match inventory {
            Some(path) => {
                let inventory: JokerInventory = read_json(&path)?;
                let streak_start = streak_start
                    .as_deref()
                    .map(|s| parse_date(Some(s)))
                    .transpose()?;
                let now = parse_now(now.as_deref())?;
                print_json(&grant_golden_joker(
                    &inventory,
                    previous,
                    new,
                    streak_start,
                    now,
                    &config.jokers,
                ))
            }
            None => {
                let interval = config.jokers.golden_interval_days;
                print_json(&json!({
                    "previous": previous,
                    "new": new,
                    "reward": check_golden_joker_reward(previous, new, interval),
                }))
            }
        },
    }
}
