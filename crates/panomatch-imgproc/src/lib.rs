#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image filtering module.
pub mod filter;

/// utilities for interpolation.
pub mod interpolation;

/// border extension policies for filters.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;
