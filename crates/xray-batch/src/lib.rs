#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for batch processing.
pub mod error;

/// Processing and saving of image files.
pub mod coordinator;

/// Per-image and per-batch result containers.
pub mod result;

/// Background execution of a batch.
pub mod task;

pub use crate::coordinator::{
    process_batch, process_single, sanitize_label, save_batch, save_results,
};
pub use crate::error::BatchError;
pub use crate::result::{BatchEntry, BatchResult, ImageResult, TechniqueOutput};
pub use crate::task::BatchTask;
