//! Command-line interface for configuring and running generation

use crate::catalog::{Layer, LayerLayout};
use crate::generation::NullObserver;
use crate::generation::orchestrator::{GenerationReport, Generator};
use crate::io::configuration::{
    DEFAULT_MAX_COUNT, DEFAULT_OUTPUT_DIR, GenerationConfig, GenerationMode, OutputFormat,
};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use crate::rarity::RarityTier;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "layermint")]
#[command(
    author,
    version,
    about = "Generate layered collectible images with rarity-weighted traits"
)]
/// Command-line arguments for the generator
// Each flag maps onto one configuration field
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// JSON configuration document; other flags override its fields
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Layer as NAME=PATH, or a bare PATH named after its directory (bottom layer first)
    #[arg(short, long = "layer", value_name = "NAME=PATH")]
    pub layers: Vec<Layer>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Number of items to generate
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Generation mode
    #[arg(short, long, value_enum)]
    pub mode: Option<GenerationMode>,

    /// Image format of generated items
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Restrict selection to these tiers (repeatable)
    #[arg(short, long = "rarity", value_enum)]
    pub rarities: Vec<RarityTier>,

    /// Random seed for reproducible generation
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Tier partitioning of layer directories
    #[arg(long, value_enum)]
    pub layout: Option<LayerLayout>,

    /// Skip the metadata.csv summary
    #[arg(long)]
    pub no_csv: bool,

    /// Omit the aggregate rarity score from metadata
    #[arg(long)]
    pub no_score: bool,

    /// Write the effective configuration to FILE before generating
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Merge the configuration document, if any, with command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or the result is invalid
    pub fn build_config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::load(path)?,
            None => GenerationConfig::new(Vec::new(), DEFAULT_OUTPUT_DIR, DEFAULT_MAX_COUNT),
        };

        if !self.layers.is_empty() {
            config.layers.clone_from(&self.layers);
        }
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }
        if let Some(count) = self.count {
            config.max_count = count;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(format) = self.format {
            config.image_format = format;
        }
        if !self.rarities.is_empty() {
            config.rarity_filter = Some(self.rarities.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if self.no_csv {
            config.csv_export = false;
        }
        if self.no_score {
            config.aggregate_score = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Install the log subscriber; `RUST_LOG` overrides the default level
pub fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Runs one generation from parsed arguments
pub struct CliRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CliRunner {
    /// Create a runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Build the configuration, optionally save it, and generate
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or generation fails
    pub fn process(&mut self) -> Result<GenerationReport> {
        let config = self.cli.build_config()?;

        if let Some(path) = &self.cli.save_config {
            config.save(path)?;
            info!(path = %path.display(), "configuration saved");
        }

        let mut generator = Generator::new(config)?;
        let report = match self.progress_manager.as_mut() {
            Some(pm) => generator.run(pm)?,
            None => generator.run(&mut NullObserver)?,
        };

        info!(
            generated = report.len(),
            output = %generator.config().output_dir.display(),
            "done"
        );
        Ok(report)
    }
}
