use std::path::{Path, PathBuf};

use clap::Subcommand;
use hearth_core::achievements::{achievement_catalog, tier_progress, update_achievements_from_stats};
use hearth_core::{AchievementStats, UserAchievements};

use super::{load_config, parse_now, print_json, read_json, CliResult};

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// Update achievement progress from a stats snapshot
    Update {
        /// Stored achievements JSON; fresh state for --user when omitted
        #[arg(long)]
        achievements: Option<PathBuf>,
        #[arg(long)]
        user: Option<String>,
        /// Stats snapshot JSON
        #[arg(long)]
        stats: PathBuf,
        #[arg(long)]
        now: Option<String>,
    },
    /// Show the tier for a point total
    Tier { points: u32 },
    /// List every achievement
    Catalog,
}

pub fn run(action: AchievementsAction, config_path: Option<&Path>) -> CliResult {
    match action {
        AchievementsAction::Update {
            achievements,
            user,
            stats,
            now,
        } => {
            let achievements: UserAchievements = match (achievements, user) {
                (Some(path), _) => read_json(&path)?,
                (None, Some(user)) => UserAchievements::new(user),
                (None, None) => return Err("either --achievements or --user is required".into()),
            };
            let stats: AchievementStats = read_json(&stats)?;
            let now = parse_now(now.as_deref())?;
            print_json(&update_achievements_from_stats(&achievements, &stats, now))
        }
        AchievementsAction::Tier { points } => {
            let config = load_config(config_path)?;
            print_json(&tier_progress(points, &config.achievements.tiers))
        }
        AchievementsAction::Catalog => print_json(&achievement_catalog()),
    }
}
