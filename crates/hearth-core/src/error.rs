//! Core error types for hearth-core.
//!
//! Business outcomes such as "joker unavailable" or "recovery window
//! expired" are never errors; they are reported through the result structs
//! of each operation. The types here cover caller misuse (malformed input
//! shapes) and configuration problems only.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for hearth-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Two activity records for the same user and calendar day.
    #[error("Duplicate activity for user '{user_id}' on {date}; merge same-day records first")]
    DuplicateActivityDay { user_id: String, date: NaiveDate },

    /// An activity record belonging to a different user was passed in.
    #[error("Activity for user '{found}' passed while computing user '{expected}'")]
    ForeignActivity { expected: String, found: String },

    /// The same member appears twice in a household roster.
    #[error("Member '{0}' appears more than once in the household roster")]
    DuplicateMember(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_day_message_names_user_and_date() {
        let err = EngineError::DuplicateActivityDay {
            user_id: "mia".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mia"));
        assert!(msg.contains("2026-03-04"));
    }

    #[test]
    fn config_error_converts_into_engine_error() {
        let err: EngineError = ConfigError::UnknownKey("jokers.nope".to_string()).into();
        assert!(matches!(err, EngineError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn io_and_validation_errors_convert_into_engine_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Io(_)));

        let err: EngineError =
            ValidationError::invalid("inventory.user_id", "belongs to 'leo'").into();
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid value for 'inventory.user_id': belongs to 'leo'"
        );
    }
}
