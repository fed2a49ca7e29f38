//! Rarity tiers and weighted selection

/// Two-stage tier-then-item sampling
pub mod sampler;
/// Tier enumeration and validated probability tables
pub mod tier;

pub use sampler::{RandomSelector, RaritySampler};
pub use tier::{RarityTable, RarityTier};
