//! Filter operations
//!
//! This module provides the linear filters used by the feature pipeline:
//! separable correlation, Gaussian smoothing and Sobel derivatives.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
