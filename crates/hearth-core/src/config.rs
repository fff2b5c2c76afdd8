//! TOML-based engine configuration.
//!
//! Every tunable of the engine lives in one [`EngineConfig`]:
//! - Streak thresholds, recovery window and milestone ladder
//! - Joker allocation, capacity and expiry
//! - Achievement tier thresholds
//! - Leaderboard scoring weights
//!
//! The engine itself only ever receives the config as a value; reading it
//! from `~/.config/hearth/config.toml` is a convenience for the CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::achievements::AchievementConfig;
use crate::error::{ConfigError, Result};
use crate::joker::JokerConfig;
use crate::leaderboard::LeaderboardConfig;
use crate::streak::StreakConfig;

/// Engine configuration.
///
/// Serialized to/from TOML; missing sections and keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub jokers: JokerConfig,
    #[serde(default)]
    pub achievements: AchievementConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

/// Directory holding the config file.
///
/// `~/.config/hearth`, or `~/.config/hearth-dev` when `HEARTH_ENV=dev`.
/// Created if missing.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HEARTH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hearth-dev")
    } else {
        base_dir.join("hearth")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl EngineConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(key, e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(key, format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(key, format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(key, e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            return Ok(Self::load_from(&path)?);
        }
        let cfg = Self::default();
        cfg.save_to(&path)?;
        Ok(cfg)
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: EngineConfig = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)?;
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!("saved config to {}", path.display());
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key.
    ///
    /// The change is applied only if the resulting config still validates.
    /// Persisting is left to the caller.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(key, e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: EngineConfig =
            serde_json::from_value(json).map_err(|e| invalid(key, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ladder = &self.streak.milestones;
        if ladder.is_empty() || ladder[0] == 0 || ladder.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid(
                "streak.milestones",
                "must be non-empty, positive and strictly ascending",
            ));
        }

        let min_weight = self.streak.activity_threshold.min_weight;
        if !min_weight.is_finite() || min_weight < 0.0 {
            return Err(invalid(
                "streak.activity_threshold.min_weight",
                "must be a non-negative number",
            ));
        }

        if self.jokers.max_storable == 0 {
            return Err(invalid("jokers.max_storable", "must be at least 1"));
        }

        if self.jokers.golden_interval_days == 0 {
            return Err(invalid("jokers.golden_interval_days", "must be at least 1"));
        }

        if !self.achievements.tiers.is_ascending() {
            return Err(invalid(
                "achievements.tiers",
                "thresholds must be positive and strictly ascending",
            ));
        }

        let multiplier = self.leaderboard.critical_task_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(invalid(
                "leaderboard.critical_task_multiplier",
                "must be at least 1.0",
            ));
        }

        Ok(())
    }
}
