//! Progress reporting and cooperative cancellation for generation runs

use crate::generation::orchestrator::{GeneratedItem, GenerationPhase};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

/// Receives run progress on the generating worker
///
/// Callbacks run on the worker itself and should return promptly.
pub trait GenerationObserver {
    /// Called on every phase transition
    fn on_phase(&mut self, _phase: &GenerationPhase) {}

    /// Called once per item whose image and metadata were both written
    fn on_item(&mut self, item: &GeneratedItem);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GeneratedItem),
{
    fn on_item(&mut self, item: &GeneratedItem) {
        self(item);
    }
}

/// Observer that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl GenerationObserver for NullObserver {
    fn on_item(&mut self, _item: &GeneratedItem) {}
}

/// Events published to a channel for a consumer draining on its own schedule
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The run entered a new phase
    Phase(GenerationPhase),
    /// An item was fully written
    ItemGenerated {
        /// Sequential item id
        id: u64,
        /// Written image file
        image_path: PathBuf,
        /// Written metadata file
        metadata_path: PathBuf,
    },
}

/// Publishes progress as [`ProgressEvent`]s
///
/// A disconnected receiver is tolerated; generation continues without a listener.
#[derive(Clone, Debug)]
pub struct ChannelObserver {
    sender: Sender<ProgressEvent>,
}

impl ChannelObserver {
    /// Wrap a channel sender
    pub const fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl GenerationObserver for ChannelObserver {
    fn on_phase(&mut self, phase: &GenerationPhase) {
        self.sender.send(ProgressEvent::Phase(phase.clone())).ok();
    }

    fn on_item(&mut self, item: &GeneratedItem) {
        self.sender
            .send(ProgressEvent::ItemGenerated {
                id: item.id,
                image_path: item.image_path.clone(),
                metadata_path: item.metadata_path.clone(),
            })
            .ok();
    }
}

/// Shared flag checked between items, never mid-item
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an untriggered token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stop at the next item boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
