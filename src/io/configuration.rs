//! Generation constants and the serializable run configuration

use crate::catalog::{Layer, LayerLayout};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::rarity::{RarityTable, RarityTier};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Recognized layer asset extensions, matched case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

// Tier probabilities are checked once against this tolerance
/// Allowed deviation of the probability sum from 1.0
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Redraws allowed per item after a duplicate before giving up on uniqueness
pub const DEFAULT_MAX_UNIQUE_ATTEMPTS: usize = 100;

/// Item count used when none is configured
pub const DEFAULT_MAX_COUNT: u64 = 10;

/// Output directory used when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "output";

// Output layout
/// Subdirectory of the output directory receiving images
pub const IMAGE_SUBDIR: &str = "nfts";
/// Subdirectory of the output directory receiving metadata records
pub const METADATA_SUBDIR: &str = "metadata";
/// Prefix of every per-item file stem
pub const ITEM_FILE_PREFIX: &str = "NFT_";
/// File name of the run-level tabular export
pub const SUMMARY_FILE_NAME: &str = "metadata.csv";

// Metadata defaults
/// Description written into every record unless overridden
pub const DEFAULT_DESCRIPTION: &str = "An NFT generated from custom layers.";
/// Image reference template; `{id}` and `{ext}` are substituted
pub const DEFAULT_IMAGE_URI_TEMPLATE: &str = "nfts/NFT_{id}.{ext}";

/// How combinations are produced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Rarity-weighted draws with duplicate rejection
    #[default]
    Random,
    /// Deterministic walk over every combination, up to the requested count
    #[serde(alias = "exhaustive")]
    ExhaustiveUnique,
}

/// Encoding of composed images
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG with transparency
    #[default]
    Png,
    /// JPEG written with a `.jpg` extension
    Jpg,
    /// JPEG written with a `.jpeg` extension
    Jpeg,
}

impl OutputFormat {
    /// File extension of written images
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
        }
    }

    /// Encoder used for this format
    pub const fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpg | Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }

    /// Whether the encoder keeps an alpha channel
    pub const fn supports_alpha(self) -> bool {
        matches!(self, Self::Png)
    }
}

const fn default_true() -> bool {
    true
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_image_uri_template() -> String {
    DEFAULT_IMAGE_URI_TEMPLATE.to_string()
}

const fn default_max_unique_attempts() -> usize {
    DEFAULT_MAX_UNIQUE_ATTEMPTS
}

// Older documents store the count as the text of an entry field
fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Everything a run needs, as read from or written to a JSON document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Layers in compositing order, bottom first
    pub layers: Vec<Layer>,
    /// Root of the `nfts/`, `metadata/`, and summary outputs
    pub output_dir: PathBuf,
    /// Number of items to generate (an upper bound in exhaustive mode)
    #[serde(alias = "max_nfts", deserialize_with = "deserialize_count")]
    pub max_count: u64,
    /// Random or exhaustive generation
    #[serde(default)]
    pub mode: GenerationMode,
    /// Encoding of composed images
    #[serde(default)]
    pub image_format: OutputFormat,
    /// Tiers to keep; all tiers when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity_filter: Option<Vec<RarityTier>>,
    /// Seed for reproducible random runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Tier partitioning of layer directories
    #[serde(default)]
    pub layout: LayerLayout,
    /// Custom tier probabilities in rank order; the standard table when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity_weights: Option<[f64; 6]>,
    /// Whether metadata carries an aggregate rarity score
    #[serde(default = "default_true")]
    pub aggregate_score: bool,
    /// Whether a tabular summary is written at the end of the run
    #[serde(default = "default_true")]
    pub csv_export: bool,
    /// Description written into every record
    #[serde(default = "default_description")]
    pub description: String,
    /// Image reference template; `{id}` and `{ext}` are substituted
    #[serde(default = "default_image_uri_template")]
    pub image_uri_template: String,
    /// Optional external link template; `{id}` is substituted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url_template: Option<String>,
    /// Redraws allowed per item after the first draw before a random run gives up on uniqueness
    #[serde(default = "default_max_unique_attempts")]
    pub max_unique_attempts: usize,
}

impl GenerationConfig {
    /// Create a configuration with defaults for everything but the essentials
    pub fn new(layers: Vec<Layer>, output_dir: impl Into<PathBuf>, max_count: u64) -> Self {
        Self {
            layers,
            output_dir: output_dir.into(),
            max_count,
            mode: GenerationMode::default(),
            image_format: OutputFormat::default(),
            rarity_filter: None,
            seed: None,
            layout: LayerLayout::default(),
            rarity_weights: None,
            aggregate_score: true,
            csv_export: true,
            description: default_description(),
            image_uri_template: default_image_uri_template(),
            external_url_template: None,
            max_unique_attempts: DEFAULT_MAX_UNIQUE_ATTEMPTS,
        }
    }

    /// Read and validate a JSON configuration document
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid document, or
    /// fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenerationError::FileSystem {
            path: path.to_path_buf(),
            operation: "read configuration",
            source: e,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| GenerationError::Serialization {
                path: path.to_path_buf(),
                operation: "parse configuration",
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        let text =
            serde_json::to_string_pretty(self).map_err(|e| GenerationError::Serialization {
                path: path.to_path_buf(),
                operation: "encode configuration",
                source: e,
            })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
        std::fs::write(path, text).map_err(|e| GenerationError::FileSystem {
            path: path.to_path_buf(),
            operation: "write configuration",
            source: e,
        })
    }

    /// Check everything that can be checked before touching the file system
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.max_count == 0 {
            return Err(invalid_parameter(
                "max_count",
                &self.max_count,
                &"at least one item must be requested",
            ));
        }

        if self.layers.is_empty() {
            return Err(invalid_parameter(
                "layers",
                &"[]",
                &"at least one layer is required",
            ));
        }

        let mut names = HashSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(invalid_parameter(
                    "layers",
                    &layer.path.display(),
                    &"layer names must not be empty",
                ));
            }
            if !names.insert(layer.name.as_str()) {
                return Err(invalid_parameter(
                    "layers",
                    &layer.name,
                    &"layer names must be unique",
                ));
            }
        }

        if self.rarity_filter.as_ref().is_some_and(Vec::is_empty) {
            return Err(invalid_parameter(
                "rarity_filter",
                &"[]",
                &"an explicit filter must retain at least one tier",
            ));
        }

        if self.max_unique_attempts == 0 {
            return Err(invalid_parameter(
                "max_unique_attempts",
                &self.max_unique_attempts,
                &"at least one retry per item is required",
            ));
        }

        self.rarity_table().map(|_| ())
    }

    /// Validated probability table for this run
    ///
    /// # Errors
    ///
    /// Returns a configuration error if custom weights are invalid
    pub fn rarity_table(&self) -> Result<RarityTable> {
        self.rarity_weights
            .map_or_else(|| Ok(RarityTable::standard()), RarityTable::new)
    }

    /// Directory receiving composed images
    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGE_SUBDIR)
    }

    /// Directory receiving metadata records
    pub fn metadata_dir(&self) -> PathBuf {
        self.output_dir.join(METADATA_SUBDIR)
    }

    /// Location of the run-level tabular export
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE_NAME)
    }

    /// Image location of an item
    pub fn image_path(&self, id: u64) -> PathBuf {
        self.image_dir().join(format!(
            "{ITEM_FILE_PREFIX}{id}.{}",
            self.image_format.extension()
        ))
    }

    /// Metadata location of an item
    pub fn metadata_path(&self, id: u64) -> PathBuf {
        self.metadata_dir()
            .join(format!("{ITEM_FILE_PREFIX}{id}.json"))
    }
}
