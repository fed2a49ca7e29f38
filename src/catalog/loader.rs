//! Scans layer directories into a rarity-partitioned catalog

use crate::catalog::layer::{CatalogItem, Layer, LayerCatalog, LayerPool, has_extension};
use crate::io::configuration::IMAGE_EXTENSIONS;
use crate::io::error::{GenerationError, Result};
use crate::rarity::RarityTier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How a layer directory is partitioned into tiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayerLayout {
    /// Tiered when any tier subdirectory exists, flat otherwise
    #[default]
    Auto,
    /// Assets sit directly in the layer directory; tiers come from file names
    Flat,
    /// Assets sit in one subdirectory per tier
    Tiered,
}

/// Builds a [`LayerCatalog`] from layer directories
#[derive(Clone, Debug)]
pub struct CatalogLoader {
    layout: LayerLayout,
    retained: Vec<RarityTier>,
}

impl CatalogLoader {
    /// Create a loader; tiers outside `rarity_filter` are skipped for every layer
    pub fn new(layout: LayerLayout, rarity_filter: Option<&[RarityTier]>) -> Self {
        let retained = RarityTier::ALL
            .into_iter()
            .filter(|tier| rarity_filter.is_none_or(|filter| filter.contains(tier)))
            .collect();
        Self { layout, retained }
    }

    /// Tiers that survive the filter, in rank order
    pub fn retained_tiers(&self) -> &[RarityTier] {
        &self.retained
    }

    /// Load every layer in order
    ///
    /// # Errors
    ///
    /// Returns a file system error if an existing directory cannot be listed
    pub fn load(&self, layers: &[Layer]) -> Result<LayerCatalog> {
        let pools = layers
            .iter()
            .map(|layer| self.load_layer(layer))
            .collect::<Result<Vec<_>>>()?;
        Ok(LayerCatalog::new(pools))
    }

    /// Load a single layer
    ///
    /// Missing directories contribute no items. A layer left without items is
    /// reported as a warning rather than an error.
    ///
    /// # Errors
    ///
    /// Returns a file system error if an existing directory cannot be listed
    pub fn load_layer(&self, layer: &Layer) -> Result<LayerPool> {
        let mut pool = LayerPool::new(&layer.name, &self.retained);

        if self.is_tiered(&layer.path) {
            for &tier in &self.retained {
                let Some(dir) = tier_directory(&layer.path, tier) else {
                    continue;
                };
                for file in scan_images(&dir)? {
                    pool.insert(CatalogItem::new(&layer.name, tier, file));
                }
            }
        } else {
            for file in scan_images(&layer.path)? {
                let tier = infer_tier(&file);
                if self.retained.contains(&tier) {
                    pool.insert(CatalogItem::new(&layer.name, tier, file));
                }
            }
        }

        if pool.is_empty() {
            warn!(
                layer = %layer.name,
                path = %layer.path.display(),
                "layer has no items in any retained rarity tier"
            );
        } else {
            debug!(layer = %layer.name, items = pool.len(), "loaded layer");
        }

        Ok(pool)
    }

    fn is_tiered(&self, layer_path: &Path) -> bool {
        match self.layout {
            LayerLayout::Flat => false,
            LayerLayout::Tiered => true,
            LayerLayout::Auto => RarityTier::ALL
                .into_iter()
                .any(|tier| tier_directory(layer_path, tier).is_some()),
        }
    }
}

/// Subdirectory holding a tier's assets, probed under the tier name and its lowercase form
pub fn tier_directory(layer_path: &Path, tier: RarityTier) -> Option<PathBuf> {
    [tier.name().to_string(), tier.name().to_lowercase()]
        .into_iter()
        .map(|name| layer_path.join(name))
        .find(|candidate| candidate.is_dir())
}

/// Tier implied by a file name: the highest tier named in it, otherwise Common
///
/// Tier names must appear as whole tokens of the file stem, delimited by `_`, `-`,
/// `.` or whitespace, so `epicenter.png` stays Common while `star_epic.png` is Epic.
pub fn infer_tier(file: &Path) -> RarityTier {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let tokens: Vec<&str> = stem
        .split(|c: char| matches!(c, '_' | '-' | '.') || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    RarityTier::ALL
        .into_iter()
        .rev()
        .find(|tier| {
            let name = tier.name().to_lowercase();
            tokens.iter().any(|token| *token == name)
        })
        .unwrap_or(RarityTier::Common)
}

/// Image files directly inside a directory, sorted by file name
///
/// A missing directory yields no files.
///
/// # Errors
///
/// Returns a file system error if an existing directory cannot be listed
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(GenerationError::FileSystem {
                path: dir.to_path_buf(),
                operation: "list directory",
                source: e,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if path.is_file() && has_extension(&path, IMAGE_EXTENSIONS) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
