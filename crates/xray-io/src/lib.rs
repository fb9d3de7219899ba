#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and encoding/decoding failures.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any_mono8`] for automatic format detection.
pub mod functional;

/// PNG image encoding and decoding.
///
/// Read and write 8-bit grayscale PNG images.
pub mod png;

pub use crate::error::IoError;
