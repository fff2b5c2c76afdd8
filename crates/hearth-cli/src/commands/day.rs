use std::path::{Path, PathBuf};

use clap::Subcommand;
use hearth_core::{DailyInput, GamificationEngine};

use super::{load_config, print_json, read_json, CliResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Run the daily processor for one user
    Process {
        /// Daily input JSON (history, stored state, stats, now)
        #[arg(long)]
        input: PathBuf,
        /// Print only the notifications
        #[arg(long)]
        notifications_only: bool,
    },
}

pub fn run(action: DayAction, config_path: Option<&Path>) -> CliResult {
    match action {
        DayAction::Process {
            input,
            notifications_only,
        } => {
            let engine = GamificationEngine::with_config(load_config(config_path)?);
            let input: DailyInput = read_json(&input)?;
            let outcome = engine.process_day(&input)?;
            if notifications_only {
                print_json(&outcome.notifications)
            } else {
                print_json(&outcome)
            }
        }
    }
}
