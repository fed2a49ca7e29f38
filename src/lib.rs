//! Layered collectible image generation driven by rarity-weighted trait selection
//!
//! Layer directories are scanned into a rarity-partitioned catalog, one item per layer is
//! drawn (or enumerated) into a unique combination, the combination is alpha-composited
//! into a single image, and a metadata record describing its traits is written next to it.

#![forbid(unsafe_code)]

/// Layer definitions and the catalog of selectable assets discovered on disk
pub mod catalog;
/// Combination tracking, uniqueness enforcement, and the end-to-end generation driver
pub mod generation;
/// Input/output operations, configuration, and error handling
pub mod io;
/// Rarity tiers, probability tables, and weighted selection
pub mod rarity;

pub use catalog::{CatalogItem, Layer, LayerCatalog};
pub use generation::orchestrator::{GeneratedItem, GenerationReport, Generator};
pub use io::configuration::GenerationConfig;
pub use io::error::{GenerationError, Result};
pub use rarity::{RarityTable, RarityTier};
