use std::path::{Path, PathBuf};

use clap::Subcommand;
use hearth_core::leaderboard::{
    generate_family_leaderboard, get_period_date_range, get_previous_period_range,
    LeaderboardPeriod, LeaderboardRequest, ScoringDimension,
};

use super::{load_config, parse_now, print_json, read_json, CliResult};

#[derive(Subcommand)]
pub enum LeaderboardAction {
    /// Rank household members
    Rank {
        /// Leaderboard request JSON (household, members, previous ranking)
        #[arg(long)]
        request: PathBuf,
        /// Override the request's dimension
        #[arg(long, value_parser = parse_enum::<ScoringDimension>)]
        dimension: Option<ScoringDimension>,
        /// Override the request's period
        #[arg(long, value_parser = parse_enum::<LeaderboardPeriod>)]
        period: Option<LeaderboardPeriod>,
        #[arg(long)]
        now: Option<String>,
    },
    /// Resolve a period to its date range
    Period {
        #[arg(value_parser = parse_enum::<LeaderboardPeriod>)]
        period: LeaderboardPeriod,
        /// Show the previous cycle instead
        #[arg(long)]
        previous: bool,
        #[arg(long)]
        now: Option<String>,
    },
}

/// Parse a snake_case enum value the way it appears in JSON.
fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unknown value '{s}'"))
}

pub fn run(action: LeaderboardAction, config_path: Option<&Path>) -> CliResult {
    match action {
        LeaderboardAction::Rank {
            request,
            dimension,
            period,
            now,
        } => {
            let config = load_config(config_path)?;
            let mut request: LeaderboardRequest = read_json(&request)?;
            if let Some(dimension) = dimension {
                request.dimension = dimension;
            }
            if let Some(period) = period {
                request.period = period;
            }
            let now = parse_now(now.as_deref())?;
            print_json(&generate_family_leaderboard(&request, now, &config.leaderboard)?)
        }
        LeaderboardAction::Period {
            period,
            previous,
            now,
        } => {
            let now = parse_now(now.as_deref())?;
            if previous {
                match get_previous_period_range(period, now) {
                    Some(range) => print_json(&range),
                    None => Err("all_time has no previous period".into()),
                }
            } else {
                print_json(&get_period_date_range(period, now))
            }
        }
    }
}
