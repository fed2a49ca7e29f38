//! Input/output operations and error handling

/// Command-line interface and run driver
pub mod cli;
/// Constants and the serializable generation document
pub mod configuration;
/// Error types and context management
pub mod error;
/// Tabular summary export across a whole run
pub mod export;
/// Layer-stack alpha compositing and image encoding
pub mod image;
/// Metadata record synthesis
pub mod metadata;
/// Terminal progress display
pub mod progress;
