//! Rarity tiers and the validated probability table used for weighted selection

use crate::io::configuration::PROBABILITY_TOLERANCE;
use crate::io::error::{Result, invalid_parameter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed ordered rarity classes, from most to least frequently drawn
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum RarityTier {
    /// Rank 1
    #[serde(alias = "common")]
    Common,
    /// Rank 2
    #[serde(alias = "rare")]
    Rare,
    /// Rank 3
    #[serde(alias = "epic")]
    Epic,
    /// Rank 4
    #[serde(alias = "legendary")]
    Legendary,
    /// Rank 5
    #[serde(alias = "mythic")]
    Mythic,
    /// Rank 6
    #[serde(alias = "exotic")]
    Exotic,
}

impl RarityTier {
    /// Every tier in rank order
    pub const ALL: [Self; 6] = [
        Self::Common,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Mythic,
        Self::Exotic,
    ];

    /// Numeric rank, 1 for Common through 6 for Exotic
    pub const fn rank(self) -> u8 {
        match self {
            Self::Common => 1,
            Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
            Self::Mythic => 5,
            Self::Exotic => 6,
        }
    }

    /// Tier holding the given rank
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Self::Common),
            2 => Some(Self::Rare),
            3 => Some(Self::Epic),
            4 => Some(Self::Legendary),
            5 => Some(Self::Mythic),
            6 => Some(Self::Exotic),
            _ => None,
        }
    }

    /// Display name, also used as the tier subdirectory name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythic => "Mythic",
            Self::Exotic => "Exotic",
        }
    }

    const fn index(self) -> usize {
        self.rank() as usize - 1
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selection probability per tier, validated once at construction
///
/// The table is immutable after validation and handed to the sampler explicitly,
/// so every draw in a run sees the same weights.
#[derive(Clone, Debug, PartialEq)]
pub struct RarityTable {
    weights: [f64; 6],
}

impl RarityTable {
    /// Probabilities for Common through Exotic
    pub const STANDARD_WEIGHTS: [f64; 6] = [0.50, 0.25, 0.15, 0.07, 0.02, 0.01];

    /// Build a table from per-tier probabilities in rank order
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any weight is negative or non-finite,
    /// or if the weights do not sum to 1.0
    pub fn new(weights: [f64; 6]) -> Result<Self> {
        for (tier, weight) in RarityTier::ALL.iter().zip(weights) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid_parameter(
                    "rarity_weights",
                    &weight,
                    &format!("probability for {tier} must be a finite non-negative number"),
                ));
            }
        }

        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(invalid_parameter(
                "rarity_weights",
                &total,
                &"tier probabilities must sum to 1.0",
            ));
        }

        Ok(Self { weights })
    }

    /// The standard 50/25/15/7/2/1 percent table
    pub const fn standard() -> Self {
        Self {
            weights: Self::STANDARD_WEIGHTS,
        }
    }

    /// Selection probability of a tier
    pub fn weight(&self, tier: RarityTier) -> f64 {
        self.weights.get(tier.index()).copied().unwrap_or(0.0)
    }

    /// All probabilities in rank order
    pub const fn weights(&self) -> &[f64; 6] {
        &self.weights
    }
}

impl Default for RarityTable {
    fn default() -> Self {
        Self::standard()
    }
}
