use crate::generation::combination::{Combination, CombinationFingerprint};
use crate::io::configuration::DEFAULT_MAX_UNIQUE_ATTEMPTS;
use crate::io::error::{GenerationError, Result};
use std::collections::HashSet;
use tracing::debug;

/// Fingerprints already emitted during a run, with a bounded redraw policy
///
/// The check-then-insert sequence is not synchronized; one tracker serves one worker.
#[derive(Clone, Debug)]
pub struct UniquenessTracker {
    seen: HashSet<CombinationFingerprint>,
    max_retries: usize,
}

impl Default for UniquenessTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNIQUE_ATTEMPTS)
    }
}

impl UniquenessTracker {
    /// Create a tracker allowing `max_retries` redraws after an item's first draw
    pub fn new(max_retries: usize) -> Self {
        Self {
            seen: HashSet::new(),
            max_retries,
        }
    }

    /// Redraws allowed per item after the first draw
    pub const fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Whether a fingerprint was already emitted
    pub fn contains(&self, fingerprint: &CombinationFingerprint) -> bool {
        self.seen.contains(fingerprint)
    }

    /// Record a fingerprint; returns false if it was already present
    pub fn insert(&mut self, fingerprint: CombinationFingerprint) -> bool {
        self.seen.insert(fingerprint)
    }

    /// Number of fingerprints recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Draw until an unseen combination appears, then record it
    ///
    /// The fingerprint is inserted before returning, so the caller never builds two
    /// items from the same combination.
    ///
    /// # Errors
    ///
    /// Propagates errors from `draw`, and returns `UniquenessExhausted` when the first
    /// draw and every allowed retry were duplicates
    pub fn accept_with<F>(&mut self, item_id: u64, mut draw: F) -> Result<Combination>
    where
        F: FnMut() -> Result<Combination>,
    {
        for retry in 0..=self.max_retries {
            let combination = draw()?;
            if self.seen.insert(combination.fingerprint()) {
                return Ok(combination);
            }
            debug!(item_id, retry, "duplicate combination, redrawing");
        }

        Err(GenerationError::UniquenessExhausted {
            item_id,
            attempts: self.max_retries.saturating_add(1),
        })
    }
}
