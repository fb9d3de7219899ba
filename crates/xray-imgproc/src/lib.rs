#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

// border extrapolation helpers.
mod border;

/// image statistics module.
pub mod core;

/// image enhancement module: histogram equalization, CLAHE and gamma correction.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// compute image histogram module.
pub mod histogram;

/// module containing parallization utilities.
pub mod parallel;
