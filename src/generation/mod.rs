//! Combination handling and the generation driver

/// Ordered per-layer selections and their uniqueness fingerprints
pub mod combination;
/// Deterministic cartesian-product enumeration of a catalog
pub mod exhaustive;
/// Progress observers, channel publishing, and cooperative cancellation
pub mod observer;
/// End-to-end run orchestration
pub mod orchestrator;
/// Bounded-retry duplicate rejection
pub mod uniqueness;

pub use combination::{Combination, CombinationFingerprint};
pub use observer::{CancellationToken, ChannelObserver, GenerationObserver, NullObserver, ProgressEvent};
pub use uniqueness::UniquenessTracker;
