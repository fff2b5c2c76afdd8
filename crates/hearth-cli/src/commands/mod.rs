//! Subcommand implementations.
//!
//! Commands read state from JSON files, run one engine operation and print
//! the result as pretty JSON on stdout. Nothing is written back; callers
//! persist the returned state themselves.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use hearth_core::EngineConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod achievements;
pub mod config;
pub mod day;
pub mod joker;
pub mod leaderboard;
pub mod streak;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Load the config from `path`, or from the default location.
///
/// A missing explicit file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    tracing::debug!(path = ?path, "loading config");
    match path {
        Some(p) if p.exists() => Ok(EngineConfig::load_from(p)?),
        Some(_) => Ok(EngineConfig::default()),
        None => Ok(EngineConfig::load()?),
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("invalid JSON in {}: {e}", path.display()))?;
    Ok(value)
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse an RFC 3339 instant, defaulting to the current time.
pub fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| format!("invalid timestamp '{s}': {e}"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Parse a `YYYY-MM-DD` date, defaulting to today (UTC).
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(s) => Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{s}': {e}"))?),
        None => Ok(Utc::now().date_naive()),
    }
}
