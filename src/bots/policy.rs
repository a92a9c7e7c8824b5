use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::card::Rank;
use crate::error::ConfigError;

/// Ranks the strategy bot assigns weights to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum WeightClass {
    Ace,
    Ten,
    Jack,
    King,
    Queen,
}

impl WeightClass {
    pub const ALL: [WeightClass; 5] = [
        WeightClass::Ace,
        WeightClass::Ten,
        WeightClass::Jack,
        WeightClass::King,
        WeightClass::Queen,
    ];

    /// `None` for ranks that never receive a weight.
    pub const fn from_rank(rank: Rank) -> Option<Self> {
        match rank {
            Rank::Ace => Some(WeightClass::Ace),
            Rank::Ten => Some(WeightClass::Ten),
            Rank::Jack => Some(WeightClass::Jack),
            Rank::King => Some(WeightClass::King),
            Rank::Queen => Some(WeightClass::Queen),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// How one weight class evolves over a game.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankPolicy {
    /// Weight a fresh card of this class enters the ledger with.
    pub base: f64,
    /// Per-decision factor while fewer tricks than the drawn cutoff were played.
    pub before_cutoff: f64,
    /// Per-decision factor once the cutoff is reached.
    pub after_cutoff: f64,
    /// Added per own point once the own score passes the drawn score cutoff.
    pub score_boost: f64,
}

impl RankPolicy {
    const fn new(base: f64, before_cutoff: f64, after_cutoff: f64, score_boost: f64) -> Self {
        Self {
            base,
            before_cutoff,
            after_cutoff,
            score_boost,
        }
    }
}

/// Per-class policies, serialized with one named entry per class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankPolicies {
    pub ace: RankPolicy,
    pub ten: RankPolicy,
    pub jack: RankPolicy,
    pub king: RankPolicy,
    pub queen: RankPolicy,
}

impl Default for RankPolicies {
    fn default() -> Self {
        Self {
            ace: RankPolicy::new(16.0, 1.10, 0.90, 0.05),
            ten: RankPolicy::new(14.0, 1.10, 0.90, 0.05),
            jack: RankPolicy::new(10.0, 1.10, 0.90, 0.0),
            king: RankPolicy::new(3.0, 1.05, 1.05, 0.0),
            queen: RankPolicy::new(2.0, 1.05, 1.05, 0.0),
        }
    }
}

impl RankPolicies {
    pub fn get(&self, class: WeightClass) -> &RankPolicy {
        match class {
            WeightClass::Ace => &self.ace,
            WeightClass::Ten => &self.ten,
            WeightClass::Jack => &self.jack,
            WeightClass::King => &self.king,
            WeightClass::Queen => &self.queen,
        }
    }
}

/// Tunable constants of the strategy bot.
///
/// Every field has a default, so a JSON file only needs to list overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    pub ranks: RankPolicies,
    /// Initial trump multiplier.
    pub trump_multiplier: f64,
    /// Added to the trump multiplier per own point past the score cutoff.
    pub trump_score_boost: f64,
    pub trick_cutoff_range: (u32, u32),
    pub score_cutoff_range: (u32, u32),
    /// Applied to a King or Queen whose partner is still in play.
    pub pair_factor: f64,
    /// Trump multiplier grows by it after a lead worth more than a King, shrinks otherwise.
    pub trump_lead_factor: f64,
    /// Same-suit cards that head the led card.
    pub beat_lead_factor: f64,
    /// Trump cards against a high plain lead.
    pub trump_over_high_lead_factor: f64,
    /// Cards worth ten or more against a trump lead.
    pub high_card_vs_trump_lead_factor: f64,
    /// Phase Two: trump holding stronger than the opponent's.
    pub trump_dominance_factor: f64,
    /// Phase Two: suits the opponent is void in while still holding trump.
    pub void_suit_factor: f64,
    /// Phase Two: suits the opponent is void in while holding no trump.
    pub void_suit_no_trump_factor: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            ranks: RankPolicies::default(),
            trump_multiplier: 5.0,
            trump_score_boost: 0.02,
            trick_cutoff_range: (3, 6),
            score_cutoff_range: (20, 40),
            pair_factor: 1.5,
            trump_lead_factor: 1.2,
            beat_lead_factor: 2.0,
            trump_over_high_lead_factor: 1.5,
            high_card_vs_trump_lead_factor: 0.5,
            trump_dominance_factor: 2.0,
            void_suit_factor: 1.5,
            void_suit_no_trump_factor: 3.0,
        }
    }
}

impl StrategyParams {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn trick_cutoffs(&self) -> RangeInclusive<u32> {
        ordered_range(self.trick_cutoff_range)
    }

    pub fn score_cutoffs(&self) -> RangeInclusive<u32> {
        ordered_range(self.score_cutoff_range)
    }
}

fn ordered_range((a, b): (u32, u32)) -> RangeInclusive<u32> {
    a.min(b)..=a.max(b)
}

/// Class weights and trump multiplier as they drift during one game.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightState {
    class_weights: [f64; 5],
    trump_multiplier: f64,
}

impl WeightState {
    pub fn new(params: &StrategyParams) -> Self {
        Self {
            class_weights: WeightClass::ALL.map(|class| params.ranks.get(class).base),
            trump_multiplier: params.trump_multiplier,
        }
    }

    pub fn class_weight(&self, class: WeightClass) -> f64 {
        self.class_weights[class.index()]
    }

    /// Current base weight for a rank, `None` for ranks without a class.
    pub fn rank_weight(&self, rank: Rank) -> Option<f64> {
        WeightClass::from_rank(rank).map(|class| self.class_weight(class))
    }

    pub fn trump_multiplier(&self) -> f64 {
        self.trump_multiplier
    }

    /// One early-phase drift step for every class.
    pub fn drift(
        &mut self,
        params: &StrategyParams,
        tricks_played: u32,
        trick_cutoff: u32,
        own_points: u32,
        score_cutoff: u32,
    ) {
        let past_score_cutoff = own_points > score_cutoff;
        for class in WeightClass::ALL {
            let policy = params.ranks.get(class);
            let weight = &mut self.class_weights[class.index()];
            *weight *= if tricks_played < trick_cutoff {
                policy.before_cutoff
            } else {
                policy.after_cutoff
            };
            if past_score_cutoff {
                *weight += policy.score_boost * f64::from(own_points);
            }
        }
        if past_score_cutoff {
            self.trump_multiplier += params.trump_score_boost * f64::from(own_points);
        }
    }

    pub fn scale_trump_multiplier(&mut self, factor: f64) {
        self.trump_multiplier *= factor;
    }
}
