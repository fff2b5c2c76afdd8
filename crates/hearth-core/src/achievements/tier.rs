//! Tier ladder over cumulative achievement points.

use serde::{Deserialize, Serialize};

/// Point bands, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
            Tier::Diamond => "Diamond",
        }
    }

    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Bronze => Some(Tier::Silver),
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => Some(Tier::Diamond),
            Tier::Diamond => None,
        }
    }
}

/// Minimum points for each tier above bronze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    #[serde(default = "default_silver")]
    pub silver: u32,
    #[serde(default = "default_gold")]
    pub gold: u32,
    #[serde(default = "default_platinum")]
    pub platinum: u32,
    #[serde(default = "default_diamond")]
    pub diamond: u32,
}

fn default_silver() -> u32 {
    100
}
fn default_gold() -> u32 {
    300
}
fn default_platinum() -> u32 {
    700
}
fn default_diamond() -> u32 {
    1500
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            silver: default_silver(),
            gold: default_gold(),
            platinum: default_platinum(),
            diamond: default_diamond(),
        }
    }
}

impl TierThresholds {
    pub fn min_points(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Bronze => 0,
            Tier::Silver => self.silver,
            Tier::Gold => self.gold,
            Tier::Platinum => self.platinum,
            Tier::Diamond => self.diamond,
        }
    }

    /// True when thresholds strictly ascend above zero.
    pub fn is_ascending(&self) -> bool {
        0 < self.silver
            && self.silver < self.gold
            && self.gold < self.platinum
            && self.platinum < self.diamond
    }
}

/// Tier plus distance to the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierProgress {
    pub tier: Tier,
    pub next_tier: Option<Tier>,
    pub points: u32,
    pub points_to_next: Option<u32>,
    /// Progress through the current band (0-100)
    pub progress_percent: f64,
}

pub fn get_user_tier(total_points: u32, thresholds: &TierThresholds) -> Tier {
    Tier::ALL
        .iter()
        .rev()
        .copied()
        .find(|tier| total_points >= thresholds.min_points(*tier))
        .unwrap_or(Tier::Bronze)
}

/// Points missing to the next tier, `None` at the top.
pub fn get_points_to_next_tier(total_points: u32, thresholds: &TierThresholds) -> Option<u32> {
    get_user_tier(total_points, thresholds)
        .next()
        .map(|next| thresholds.min_points(next).saturating_sub(total_points))
}

pub fn tier_progress(total_points: u32, thresholds: &TierThresholds) -> TierProgress {
    let tier = get_user_tier(total_points, thresholds);
    let next_tier = tier.next();
    let progress_percent = match next_tier {
        Some(next) => {
            let floor = thresholds.min_points(tier);
            let span = thresholds.min_points(next).saturating_sub(floor).max(1);
            (f64::from(total_points - floor) / f64::from(span) * 100.0).min(100.0)
        }
        None => 100.0,
    };

    TierProgress {
        tier,
        next_tier,
        points: total_points,
        points_to_next: get_points_to_next_tier(total_points, thresholds),
        progress_percent,
    }
}
