#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for grayscale raster processing.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};

/// An 8-bit single channel image, the raster every enhancement operates on.
pub type GrayImage = Image<u8, 1>;
