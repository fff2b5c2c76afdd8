//! Family leaderboard generation.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::period::{get_period_date_range, LeaderboardPeriod, PeriodRange};
use super::scoring::{calculate_percentile, calculate_score, MemberStats, ScoringDimension};
use super::LeaderboardConfig;
use crate::error::{EngineError, Result};

/// Direction of a member's rank relative to the previous cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankChangeIndicator {
    Up,
    Down,
    Same,
    /// No previous rank on record
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardBadge {
    /// Ranked first
    TopPerformer,
    /// Longest current streak in the household
    StreakLeader,
    /// Climbed the most places since the previous cycle
    MostImproved,
    /// Current streak at or above the on-fire threshold
    OnFire,
}

/// A member's standing in the previous cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousRank {
    pub user_id: String,
    pub rank: u32,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Everything a leaderboard is generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRequest {
    pub household_id: String,
    pub members: Vec<MemberStats>,
    #[serde(default)]
    pub dimension: ScoringDimension,
    #[serde(default = "default_period")]
    pub period: LeaderboardPeriod,
    #[serde(default)]
    pub current_user_id: Option<String>,
    /// Ranking for the same dimension one cycle earlier
    #[serde(default)]
    pub previous: Vec<PreviousRank>,
}

fn default_period() -> LeaderboardPeriod {
    LeaderboardPeriod::Week
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub name: String,
    /// 1-based
    pub rank: u32,
    pub previous_rank: Option<u32>,
    /// Places gained (positive) or lost (negative)
    pub rank_change: Option<i32>,
    pub change_indicator: RankChangeIndicator,
    pub score: f64,
    pub score_delta: Option<f64>,
    pub percentile: f64,
    pub badges: Vec<LeaderboardBadge>,
    pub is_current_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyLeaderboard {
    pub household_id: String,
    pub dimension: ScoringDimension,
    pub period: PeriodRange,
    pub entries: Vec<LeaderboardEntry>,
    /// Name of the first-ranked member
    pub top_performer: Option<String>,
    pub current_user_rank: Option<u32>,
    pub total_members: u32,
    pub generated_at: DateTime<Utc>,
}

pub fn get_rank_change_indicator(previous_rank: Option<u32>, new_rank: u32) -> RankChangeIndicator {
    match previous_rank {
        None => RankChangeIndicator::New,
        Some(prev) => match new_rank.cmp(&prev) {
            Ordering::Less => RankChangeIndicator::Up,
            Ordering::Greater => RankChangeIndicator::Down,
            Ordering::Equal => RankChangeIndicator::Same,
        },
    }
}

/// Rank a household on one dimension.
///
/// Members are ordered by score descending, then by name, then by user id,
/// so identical inputs always produce the same ranking and no two distinct
/// members share a rank. A member listed twice is rejected.
pub fn generate_family_leaderboard(
    request: &LeaderboardRequest,
    now: DateTime<Utc>,
    config: &LeaderboardConfig,
) -> Result<FamilyLeaderboard> {
    let mut seen = HashSet::new();
    for member in &request.members {
        if !seen.insert(member.user_id.as_str()) {
            return Err(EngineError::DuplicateMember(member.user_id.clone()));
        }
    }

    let mut scored: Vec<(&MemberStats, f64)> = request
        .members
        .iter()
        .map(|m| (m, calculate_score(m, request.dimension, &request.members, config)))
        .collect();
    scored.sort_by(|(a, score_a), (b, score_b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    let population: Vec<f64> = scored.iter().map(|(_, score)| *score).collect();
    let max_streak = request
        .members
        .iter()
        .map(|m| m.current_streak)
        .max()
        .unwrap_or(0);

    let mut entries: Vec<LeaderboardEntry> = scored
        .iter()
        .enumerate()
        .map(|(index, (member, score))| {
            let rank = index as u32 + 1;
            let previous = request.previous.iter().find(|p| p.user_id == member.user_id);
            let previous_rank = previous.map(|p| p.rank);

            let mut badges = Vec::new();
            if rank == 1 {
                badges.push(LeaderboardBadge::TopPerformer);
            }
            if max_streak > 0 && member.current_streak == max_streak {
                badges.push(LeaderboardBadge::StreakLeader);
            }
            if member.current_streak >= config.on_fire_streak {
                badges.push(LeaderboardBadge::OnFire);
            }

            LeaderboardEntry {
                user_id: member.user_id.clone(),
                name: member.name.clone(),
                rank,
                previous_rank,
                rank_change: previous_rank.map(|prev| prev as i32 - rank as i32),
                change_indicator: get_rank_change_indicator(previous_rank, rank),
                score: *score,
                score_delta: previous.and_then(|p| p.score).map(|prev| score - prev),
                percentile: calculate_percentile(*score, &population),
                badges,
                is_current_user: request.current_user_id.as_deref()
                    == Some(member.user_id.as_str()),
            }
        })
        .collect();

    let best_climb = entries
        .iter()
        .filter_map(|e| e.rank_change)
        .filter(|change| *change > 0)
        .max();
    if let Some(best) = best_climb {
        for entry in entries.iter_mut().filter(|e| e.rank_change == Some(best)) {
            entry.badges.push(LeaderboardBadge::MostImproved);
        }
    }

    let current_user_rank = entries.iter().find(|e| e.is_current_user).map(|e| e.rank);
    let top_performer = entries.first().map(|e| e.name.clone());

    tracing::debug!(
        "leaderboard for {} ({:?}): {} members",
        request.household_id,
        request.dimension,
        entries.len()
    );

    Ok(FamilyLeaderboard {
        household_id: request.household_id.clone(),
        dimension: request.dimension,
        period: get_period_date_range(request.period, now),
        total_members: entries.len() as u32,
        entries,
        top_performer,
        current_user_rank,
        generated_at: now,
    })
}
