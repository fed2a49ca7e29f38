use crate::catalog::CatalogItem;
use crate::rarity::RarityTier;
use std::path::PathBuf;

/// One selected item per layer, in layer order
///
/// Order drives both compositing (first item at the bottom) and attribute order in
/// metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combination {
    items: Vec<CatalogItem>,
}

impl Combination {
    /// Create a combination from items in layer order
    pub const fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Items in layer order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Number of layers covered
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the combination covers no layer
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Tier of each item, in layer order
    pub fn tiers(&self) -> impl Iterator<Item = RarityTier> + '_ {
        self.items.iter().map(|item| item.rarity)
    }

    /// Canonical uniqueness key
    pub fn fingerprint(&self) -> CombinationFingerprint {
        CombinationFingerprint(
            self.items
                .iter()
                .map(|item| (item.layer_name.clone(), item.rarity, item.file.clone()))
                .collect(),
        )
    }
}

/// Order-preserving hashable encoding of a combination's `(layer, tier, file)` triples
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CombinationFingerprint(Vec<(String, RarityTier, PathBuf)>);
