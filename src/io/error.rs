//! Error types and context management for generation runs

use crate::rarity::RarityTier;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
#[derive(Debug)]
pub enum GenerationError {
    /// Configuration rejected before a run is allowed to start
    Configuration {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A layer has no usable items in any retained tier
    EmptyLayer {
        /// Name of the exhausted layer
        layer: String,
        /// Item being generated when the layer was found empty
        item_id: Option<u64>,
    },

    /// Every attempt to draw an unseen combination produced a duplicate
    UniquenessExhausted {
        /// Item that could not be produced
        item_id: u64,
        /// Number of draws made before giving up
        attempts: usize,
    },

    /// Failed to open or decode a layer asset
    AssetDecode {
        /// Path to the asset
        path: PathBuf,
        /// Layer the asset belongs to
        layer: String,
        /// Tier the asset was drawn from
        tier: RarityTier,
        /// Item being composited
        item_id: Option<u64>,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to encode a composed image in the requested format
    ImageEncode {
        /// Item being encoded
        item_id: u64,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// Failed to write an output file
    AssetWrite {
        /// Destination path
        path: PathBuf,
        /// Item the file belongs to, if any
        item_id: Option<u64>,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    Serialization {
        /// Document involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying serde error
        source: serde_json::Error,
    },
}

fn item_suffix(item_id: Option<u64>) -> String {
    item_id.map_or_else(String::new, |id| format!(" (item {id})"))
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid configuration '{parameter}' = '{value}': {reason}")
            }
            Self::EmptyLayer { layer, item_id } => {
                write!(
                    f,
                    "Layer '{layer}' has no items in any retained rarity tier{}",
                    item_suffix(*item_id)
                )
            }
            Self::UniquenessExhausted { item_id, attempts } => {
                write!(
                    f,
                    "Unable to produce a unique combination for item {item_id} after {attempts} attempts"
                )
            }
            Self::AssetDecode {
                path,
                layer,
                tier,
                item_id,
                source,
            } => {
                write!(
                    f,
                    "Failed to read {tier} asset '{}' of layer '{layer}'{}: {source}",
                    path.display(),
                    item_suffix(*item_id)
                )
            }
            Self::ImageEncode { item_id, source } => {
                write!(f, "Failed to encode image for item {item_id}: {source}")
            }
            Self::AssetWrite {
                path,
                item_id,
                source,
            } => {
                write!(
                    f,
                    "Failed to write '{}'{}: {source}",
                    path.display(),
                    item_suffix(*item_id)
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "Serialization error during {operation} of '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AssetDecode { source, .. } | Self::ImageEncode { source, .. } => Some(source),
            Self::AssetWrite { source, .. } | Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            Self::Configuration { .. } | Self::EmptyLayer { .. } | Self::UniquenessExhausted { .. } => {
                None
            }
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Item being generated when the error surfaced
    pub item_id: Option<u64>,
}

/// Enriches errors raised by components that do not know which item they serve
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the item id
    ///
    /// # Errors
    ///
    /// Propagates the original error with the item id applied
    fn with_item(self, item_id: u64) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<GenerationError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only fill in ids that the raising component left blank
            match &mut error {
                GenerationError::EmptyLayer { item_id, .. }
                | GenerationError::AssetDecode { item_id, .. }
                | GenerationError::AssetWrite { item_id, .. } => {
                    if item_id.is_none() {
                        *item_id = context.item_id;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_item(self, item_id: u64) -> Result<T> {
        self.with_context(ErrorContext {
            item_id: Some(item_id),
        })
    }
}

/// Create an invalid configuration error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::Configuration {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
