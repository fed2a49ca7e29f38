//! Drives a generation run from catalog loading to the summary export
//!
//! A run moves through `Idle → LoadingCatalog → Generating(1..=N) → ExportingSummary → Done`,
//! and into `Failed` from any of those when an error stops it. Items are produced strictly one
//! at a time: draw, uniqueness check, composite, synthesize, then write. Both files of an item
//! are encoded in memory before either is written.

use crate::catalog::{CatalogLoader, LayerCatalog};
use crate::generation::combination::Combination;
use crate::generation::exhaustive::ExhaustiveCombinations;
use crate::generation::observer::{
    CancellationToken, ChannelObserver, GenerationObserver, ProgressEvent,
};
use crate::generation::uniqueness::UniquenessTracker;
use crate::io::configuration::{GenerationConfig, GenerationMode};
use crate::io::error::{GenerationError, Result, WithContext};
use crate::io::export::write_summary_csv;
use crate::io::image::{composite, encode_image, write_output};
use crate::io::metadata::{MetadataSynthesizer, NftMetadata};
use crate::rarity::{RandomSelector, RarityTable, RaritySampler};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Lifecycle of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Not started
    Idle,
    /// Scanning layer directories
    LoadingCatalog,
    /// Producing item `current` of at most `total`
    Generating {
        /// Id of the item in progress
        current: u64,
        /// Items the run will produce: the requested count, capped in exhaustive
        /// mode by the number of distinct combinations
        total: u64,
    },
    /// Writing the run-level export
    ExportingSummary,
    /// Finished successfully or by cancellation
    Done,
    /// Stopped by an error
    Failed,
}

/// An accepted combination and the files written for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedItem {
    /// Sequential id starting at 1
    pub id: u64,
    /// Selected items in layer order
    pub combination: Combination,
    /// Written image
    pub image_path: PathBuf,
    /// Written metadata record
    pub metadata_path: PathBuf,
    /// The record that was written
    pub metadata: NftMetadata,
}

/// Outcome of a completed run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Items in id order
    pub items: Vec<GeneratedItem>,
    /// Written summary export, if any
    pub summary_path: Option<PathBuf>,
    /// Whether the run stopped early on request
    pub cancelled: bool,
}

impl GenerationReport {
    /// Number of generated items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was generated
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Runs generation for one validated configuration
pub struct Generator {
    config: GenerationConfig,
    table: RarityTable,
    phase: GenerationPhase,
    cancellation: CancellationToken,
}

impl Generator {
    /// Validate the configuration and prepare a run
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration or rarity table is invalid
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        let table = config.rarity_table()?;
        Ok(Self {
            config,
            table,
            phase: GenerationPhase::Idle,
            cancellation: CancellationToken::new(),
        })
    }

    /// Configuration driving this run
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Current lifecycle phase
    pub const fn phase(&self) -> &GenerationPhase {
        &self.phase
    }

    /// Token that stops the run at the next item boundary
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Run to completion on the calling thread
    ///
    /// # Errors
    ///
    /// Returns the first error raised while loading, generating, or exporting. Items
    /// written before the failure are left in place.
    pub fn run(&mut self, observer: &mut dyn GenerationObserver) -> Result<GenerationReport> {
        match self.execute(observer) {
            Ok(report) => Ok(report),
            Err(e) => {
                error!(error = %e, "generation failed");
                self.transition(GenerationPhase::Failed, observer);
                Err(e)
            }
        }
    }

    /// Run on a single background worker, publishing progress to a channel
    pub fn spawn(mut self) -> (JoinHandle<Result<GenerationReport>>, Receiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            let mut observer = ChannelObserver::new(sender);
            self.run(&mut observer)
        });
        (handle, receiver)
    }

    fn transition(&mut self, phase: GenerationPhase, observer: &mut dyn GenerationObserver) {
        if !matches!(phase, GenerationPhase::Generating { .. }) {
            info!(phase = ?phase, "generation phase");
        }
        self.phase = phase;
        observer.on_phase(&self.phase);
    }

    fn execute(&mut self, observer: &mut dyn GenerationObserver) -> Result<GenerationReport> {
        self.transition(GenerationPhase::LoadingCatalog, observer);
        self.prepare_output_dirs()?;

        let loader = CatalogLoader::new(self.config.layout, self.config.rarity_filter.as_deref());
        let catalog = loader.load(&self.config.layers)?;
        warn_if_short(&catalog, self.config.max_count, self.config.mode);

        let (mut walker, total) = match self.config.mode {
            GenerationMode::ExhaustiveUnique => {
                catalog.ensure_populated()?;
                let total = reachable_count(&catalog, self.config.max_count);
                (Some(ExhaustiveCombinations::new(&catalog)), total)
            }
            GenerationMode::Random => (None, self.config.max_count),
        };
        let mut sampler = RaritySampler::new(
            self.table.clone(),
            RandomSelector::from_seed(self.config.seed),
        );
        let mut tracker = UniquenessTracker::new(self.config.max_unique_attempts);
        let synthesizer = MetadataSynthesizer::from_config(&self.config);

        info!(
            layers = catalog.len(),
            requested = self.config.max_count,
            total,
            mode = ?self.config.mode,
            "starting generation"
        );

        let mut report = GenerationReport::default();
        for id in 1..=total {
            if self.cancellation.is_cancelled() {
                info!(completed = report.len(), "generation cancelled");
                report.cancelled = true;
                break;
            }

            // Item `id` is announced only once its combination exists
            let combination = match walker.as_mut() {
                Some(walker) => {
                    let Some(combination) = walker.next() else {
                        info!(generated = report.len(), "every combination has been generated");
                        break;
                    };
                    tracker.insert(combination.fingerprint());
                    combination
                }
                None => tracker.accept_with(id, || {
                    sampler.sample_combination(&catalog).with_item(id)
                })?,
            };

            self.transition(GenerationPhase::Generating { current: id, total }, observer);
            let item = self.produce_item(id, combination, &synthesizer)?;
            observer.on_item(&item);
            report.items.push(item);
        }

        self.transition(GenerationPhase::ExportingSummary, observer);
        if self.config.csv_export && !report.is_empty() {
            let path = self.config.summary_path();
            let records: Vec<NftMetadata> =
                report.items.iter().map(|item| item.metadata.clone()).collect();
            write_summary_csv(&path, &records)?;
            report.summary_path = Some(path);
        }

        self.transition(GenerationPhase::Done, observer);
        info!(generated = report.len(), "generation finished");
        Ok(report)
    }

    fn prepare_output_dirs(&self) -> Result<()> {
        for dir in [self.config.image_dir(), self.config.metadata_dir()] {
            create_dir(&dir)?;
        }
        Ok(())
    }

    fn produce_item(
        &self,
        id: u64,
        combination: Combination,
        synthesizer: &MetadataSynthesizer,
    ) -> Result<GeneratedItem> {
        let image = composite(&combination).with_item(id)?;
        let image_bytes = encode_image(&image, self.config.image_format)
            .map_err(|e| GenerationError::ImageEncode { item_id: id, source: e })?;

        let metadata = synthesizer.synthesize(id, &combination);
        let metadata_path = self.config.metadata_path(id);
        let metadata_bytes =
            serde_json::to_vec_pretty(&metadata).map_err(|e| GenerationError::Serialization {
                path: metadata_path.clone(),
                operation: "encode metadata",
                source: e,
            })?;

        let image_path = self.config.image_path(id);
        write_output(&image_path, &image_bytes, id)?;
        write_output(&metadata_path, &metadata_bytes, id)?;
        debug!(id, image = %image_path.display(), "item written");

        Ok(GeneratedItem {
            id,
            combination,
            image_path,
            metadata_path,
            metadata,
        })
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| GenerationError::FileSystem {
        path: dir.to_path_buf(),
        operation: "create directory",
        source: e,
    })
}

/// Items an exhaustive run can produce: the request, capped by the cross product size
fn reachable_count(catalog: &LayerCatalog, requested: u64) -> u64 {
    catalog
        .combination_count()
        .map_or(requested, |available| {
            u64::try_from(available).map_or(requested, |available| requested.min(available))
        })
}

fn warn_if_short(catalog: &LayerCatalog, requested: u64, mode: GenerationMode) {
    let Some(available) = catalog.combination_count() else {
        return;
    };
    if u128::from(requested) > available {
        match mode {
            GenerationMode::Random => warn!(
                requested,
                available = %available,
                "more items requested than distinct combinations exist; the run will fail on uniqueness"
            ),
            GenerationMode::ExhaustiveUnique => info!(
                requested,
                available = %available,
                "fewer combinations exist than requested; generating all of them"
            ),
        }
    }
}
