//! Pixel interpolation methods for image transformations.
//!
//! The geometric transforms in [`crate::warp`] resample the source image at
//! non-integer coordinates through the kernels of this module.

mod bilinear;

pub use bilinear::bilinear_interpolation;
