use crate::io::error::{GenerationError, Result};
use crate::rarity::RarityTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A named visual category backed by a directory of assets
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Category name, used as the trait type in metadata
    pub name: String,
    /// Directory holding the layer's assets
    pub path: PathBuf,
}

impl Layer {
    /// Create a layer from a name and directory
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a layer named after the final component of its directory
    pub fn from_directory(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

/// Parses `NAME=PATH`, or a bare `PATH` named after its directory
impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let layer = match s.split_once('=') {
            Some((name, path)) => Self::new(name.trim(), path.trim()),
            None => Self::from_directory(s.trim()),
        };

        if layer.name.is_empty() {
            return Err(format!("layer '{s}' has no name"));
        }
        if layer.path.as_os_str().is_empty() {
            return Err(format!("layer '{s}' has no path"));
        }
        Ok(layer)
    }
}

/// One selectable asset of a layer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CatalogItem {
    /// Layer the asset belongs to
    pub layer_name: String,
    /// Tier the asset was discovered under
    pub rarity: RarityTier,
    /// Location of the image file
    pub file: PathBuf,
}

impl CatalogItem {
    /// Create a catalog item
    pub fn new(layer_name: impl Into<String>, rarity: RarityTier, file: impl Into<PathBuf>) -> Self {
        Self {
            layer_name: layer_name.into(),
            rarity,
            file: file.into(),
        }
    }

    /// Basename of the asset file
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Items of one layer partitioned by tier
///
/// Every retained tier has an entry, even when no asset was found for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerPool {
    name: String,
    tiers: BTreeMap<RarityTier, Vec<CatalogItem>>,
}

impl LayerPool {
    /// Create a pool with an empty slot for each retained tier
    pub fn new(name: impl Into<String>, retained: &[RarityTier]) -> Self {
        Self {
            name: name.into(),
            tiers: retained.iter().map(|&tier| (tier, Vec::new())).collect(),
        }
    }

    /// Layer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an item to its tier, creating the tier slot if needed
    pub fn insert(&mut self, item: CatalogItem) {
        self.tiers.entry(item.rarity).or_default().push(item);
    }

    /// Items available at a tier, in discovery order
    pub fn items(&self, tier: RarityTier) -> &[CatalogItem] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tiers holding at least one item, in rank order
    pub fn populated_tiers(&self) -> impl Iterator<Item = RarityTier> + '_ {
        self.tiers
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(&tier, _)| tier)
    }

    /// Tiers this pool keeps a slot for, in rank order
    pub fn retained_tiers(&self) -> impl Iterator<Item = RarityTier> + '_ {
        self.tiers.keys().copied()
    }

    /// All items, tier by tier in rank order
    pub fn all_items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.tiers.values().flatten()
    }

    /// Total number of items across tiers
    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// Whether no tier holds any item
    pub fn is_empty(&self) -> bool {
        self.tiers.values().all(Vec::is_empty)
    }
}

/// Ordered pools for every configured layer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerCatalog {
    pools: Vec<LayerPool>,
}

impl LayerCatalog {
    /// Create a catalog from pools in layer order
    pub const fn new(pools: Vec<LayerPool>) -> Self {
        Self { pools }
    }

    /// Pools in layer order
    pub fn pools(&self) -> &[LayerPool] {
        &self.pools
    }

    /// Pool for a layer name
    pub fn get(&self, name: &str) -> Option<&LayerPool> {
        self.pools.iter().find(|pool| pool.name() == name)
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether the catalog holds no layers
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Number of distinct combinations, or `None` if it overflows
    pub fn combination_count(&self) -> Option<u128> {
        self.pools
            .iter()
            .try_fold(1_u128, |acc, pool| acc.checked_mul(pool.len() as u128))
    }

    /// Require every layer to offer at least one item
    ///
    /// # Errors
    ///
    /// Returns `EmptyLayer` for the first layer with no items in any retained tier
    pub fn ensure_populated(&self) -> Result<()> {
        match self.pools.iter().find(|pool| pool.is_empty()) {
            Some(pool) => Err(GenerationError::EmptyLayer {
                layer: pool.name().to_string(),
                item_id: None,
            }),
            None => Ok(()),
        }
    }
}

/// Whether a path carries one of the given extensions, ignoring case
pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}
