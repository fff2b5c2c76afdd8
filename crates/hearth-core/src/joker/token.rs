//! Joker tokens.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of joker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JokerType {
    /// Regular monthly joker
    Standard,
    /// Rare joker from long-streak milestones, spent last
    Golden,
}

/// Where a joker came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JokerSource {
    MonthlyAllocation,
    Achievement,
}

impl JokerSource {
    fn as_str(&self) -> &'static str {
        match self {
            JokerSource::MonthlyAllocation => "monthly_allocation",
            JokerSource::Achievement => "achievement",
        }
    }
}

/// A single-use streak-saving credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerToken {
    pub id: String,
    pub user_id: String,
    pub joker_type: JokerType,
    pub granted_at: DateTime<Utc>,
    pub source: JokerSource,
    /// Set once when spent; the token is frozen afterwards
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Calendar day the spent token bridged
    #[serde(default)]
    pub covers_date: Option<NaiveDate>,
}

impl JokerToken {
    /// Create an unused token with an id derived from its origin.
    ///
    /// `origin_key` names the grant (e.g. the allocation month); together
    /// with the ordinal it makes the id stable across replays of the same
    /// grant, so storage can deduplicate retried writes.
    pub fn new(
        user_id: &str,
        joker_type: JokerType,
        source: JokerSource,
        origin_key: &str,
        ordinal: u32,
        granted_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: token_id(user_id, source, origin_key, ordinal),
            user_id: user_id.to_string(),
            joker_type,
            granted_at,
            source,
            used_at: None,
            expires_at,
            covers_date: None,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Unused and not expired at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired(now)
    }

    /// Spent copy of this token.
    pub(crate) fn spent(&self, now: DateTime<Utc>, covers: NaiveDate) -> Self {
        Self {
            used_at: Some(now),
            covers_date: Some(covers),
            ..self.clone()
        }
    }
}

fn token_id(user_id: &str, source: JokerSource, origin_key: &str, ordinal: u32) -> String {
    let name = format!("{user_id}:{}:{origin_key}:{ordinal}", source.as_str());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}
