#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the enhancement engine.
pub mod error;

/// Brightness and contrast statistics of an image.
pub mod metrics;

/// The fixed registry of enhancement techniques.
pub mod technique;

pub use crate::error::EnhanceError;
pub use crate::metrics::{compute_metrics, Metrics, MetricsComparison};
pub use crate::technique::{
    apply, apply_technique, list_techniques, technique_labels, Technique, ORIGINAL_LABEL,
};
