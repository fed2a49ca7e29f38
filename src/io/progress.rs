//! Terminal progress display for generation runs

use crate::generation::GenerationObserver;
use crate::generation::orchestrator::{GeneratedItem, GenerationPhase};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static ITEM_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix:>10} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static SPINNER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Shows a spinner while the catalog loads, then one bar across all items
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    completed: u64,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with nothing displayed yet
    pub const fn new() -> Self {
        Self {
            bar: None,
            completed: 0,
        }
    }

    /// Number of items reported so far
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    /// Replace any spinner with a bar sized for `total` items
    pub fn initialize(&mut self, total: u64) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        let bar = ProgressBar::new(total);
        bar.set_style(ITEM_STYLE.clone());
        bar.set_prefix("generating");
        self.bar = Some(bar);
    }

    /// Show a spinner with a message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(SPINNER_STYLE.clone());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(message.to_string());
        self.bar = Some(spinner);
    }

    /// Advance by one completed item
    pub fn item_completed(&mut self, item: &GeneratedItem) {
        self.completed += 1;
        if let Some(bar) = &self.bar {
            bar.inc(1);
            let name = item
                .image_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            bar.set_message(name);
        }
    }

    /// Leave the final state on screen
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }

    /// Remove the display after a failure
    pub fn abandon(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

impl GenerationObserver for ProgressManager {
    fn on_phase(&mut self, phase: &GenerationPhase) {
        match phase {
            GenerationPhase::LoadingCatalog => self.start_spinner("loading layers"),
            GenerationPhase::Generating { current: 1, total } => self.initialize(*total),
            GenerationPhase::ExportingSummary => {
                if let Some(bar) = &self.bar {
                    bar.set_prefix("exporting");
                }
            }
            GenerationPhase::Done => self.finish(),
            GenerationPhase::Failed => self.abandon(),
            GenerationPhase::Idle | GenerationPhase::Generating { .. } => {}
        }
    }

    fn on_item(&mut self, item: &GeneratedItem) {
        self.item_completed(item);
    }
}
