//! Layer catalog types and directory loading

/// Layer, item, and catalog data types
pub mod layer;
/// Directory scanning into a rarity-partitioned catalog
pub mod loader;

pub use layer::{CatalogItem, Layer, LayerCatalog, LayerPool};
pub use loader::{CatalogLoader, LayerLayout};
