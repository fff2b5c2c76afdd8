//! # Hearth Core Library
//!
//! This library provides the gamification logic for shared household chores.
//! Every operation is a pure function of its explicit inputs: the caller owns
//! all state, passes it in, and persists what comes back. The `hearth-cli`
//! binary exposes the same operations over JSON files.
//!
//! ## Architecture
//!
//! - **Streak Engine**: Recomputes streaks from the full activity history,
//!   detects breaks, evaluates recovery and combines household members
//! - **Joker System**: Monthly and golden streak-saving tokens with capacity,
//!   expiry and standard-before-golden spending
//! - **Achievement Engine**: A fixed catalog of ratcheting goals and a tier
//!   ladder over the points they award
//! - **Leaderboard**: Per-period family rankings on a selectable dimension
//!
//! ## Key Components
//!
//! - [`GamificationEngine`]: Daily processor tying the engines together
//! - [`StreakStatus`]: Derived streak state of one user
//! - [`JokerInventory`]: The one piece of explicitly mutated state
//! - [`UserAchievements`]: Achievement progress and points
//! - [`EngineConfig`]: TOML-backed configuration of every tunable

pub mod achievements;
pub mod config;
pub mod engine;
pub mod error;
pub mod joker;
pub mod leaderboard;
pub mod streak;

pub use achievements::{AchievementId, AchievementStats, Tier, UserAchievements};
pub use config::EngineConfig;
pub use engine::{DailyInput, DailyOutcome, GamificationEngine, Notification};
pub use error::{ConfigError, EngineError, Result, ValidationError};
pub use joker::{JokerInventory, JokerToken, JokerType};
pub use leaderboard::{FamilyLeaderboard, LeaderboardPeriod, MemberStats, ScoringDimension};
pub use streak::{DailyActivity, StreakStatus};
