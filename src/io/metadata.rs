//! Metadata records describing generated items

use crate::generation::Combination;
use crate::io::configuration::{GenerationConfig, OutputFormat};
use crate::rarity::RarityTier;
use serde::{Deserialize, Serialize};

/// One layer's contribution to an item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitAttribute {
    /// Layer name
    pub trait_type: String,
    /// Asset file name
    pub value: String,
    /// Tier the asset was drawn from
    pub rarity: RarityTier,
}

/// Structured record written next to each image
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
    /// Display name embedding the item id
    pub name: String,
    /// Fixed description
    pub description: String,
    /// Reference to the item's image
    pub image: String,
    /// Optional external link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// One entry per layer, in layer order
    pub attributes: Vec<TraitAttribute>,
    /// Tier nearest the mean tier rank of the combination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity_score: Option<RarityTier>,
}

/// Tier nearest the mean rank of the given tiers; Common when there are none
///
/// Halves round away from zero, so a Common/Exotic pair (mean 3.5) scores Legendary.
pub fn aggregate_rarity<I>(tiers: I) -> RarityTier
where
    I: IntoIterator<Item = RarityTier>,
{
    let (total, count) = tiers
        .into_iter()
        .fold((0_u64, 0_u64), |(total, count), tier| {
            (total + u64::from(tier.rank()), count + 1)
        });

    if count == 0 {
        return RarityTier::Common;
    }

    let mean = total as f64 / count as f64;
    RarityTier::from_rank(mean.round() as u8).unwrap_or(RarityTier::Common)
}

fn render_template(template: &str, id: u64, extension: &str) -> String {
    template
        .replace("{id}", &id.to_string())
        .replace("{ext}", extension)
}

/// Builds metadata records; pure given its inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataSynthesizer {
    description: String,
    image_uri_template: String,
    external_url_template: Option<String>,
    extension: &'static str,
    aggregate_score: bool,
}

impl MetadataSynthesizer {
    /// Create a synthesizer with explicit settings
    pub fn new(
        description: impl Into<String>,
        image_uri_template: impl Into<String>,
        format: OutputFormat,
        aggregate_score: bool,
    ) -> Self {
        Self {
            description: description.into(),
            image_uri_template: image_uri_template.into(),
            external_url_template: None,
            extension: format.extension(),
            aggregate_score,
        }
    }

    /// Add an external link template; `{id}` is substituted
    #[must_use]
    pub fn with_external_url(mut self, template: impl Into<String>) -> Self {
        self.external_url_template = Some(template.into());
        self
    }

    /// Settings taken from a run configuration
    pub fn from_config(config: &GenerationConfig) -> Self {
        let synthesizer = Self::new(
            config.description.clone(),
            config.image_uri_template.clone(),
            config.image_format,
            config.aggregate_score,
        );
        match &config.external_url_template {
            Some(template) => synthesizer.with_external_url(template.clone()),
            None => synthesizer,
        }
    }

    /// Build the record for an item
    pub fn synthesize(&self, id: u64, combination: &Combination) -> NftMetadata {
        let attributes = combination
            .items()
            .iter()
            .map(|item| TraitAttribute {
                trait_type: item.layer_name.clone(),
                value: item.file_name(),
                rarity: item.rarity,
            })
            .collect();

        NftMetadata {
            name: format!("NFT #{id}"),
            description: self.description.clone(),
            image: render_template(&self.image_uri_template, id, self.extension),
            external_url: self
                .external_url_template
                .as_deref()
                .map(|template| render_template(template, id, self.extension)),
            attributes,
            rarity_score: self
                .aggregate_score
                .then(|| aggregate_rarity(combination.tiers())),
        }
    }
}
