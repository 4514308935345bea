//! Geometric image transformations using affine warps.
//!
//! This module provides functions for applying 2D affine transformations to images
//! and for building the elementary matrices (translation, rotation, scale) that are
//! composed into them.
//!
//! # Examples
//!
//! Building a transform that moves `(10, 20)` to the origin and halves the scale:
//!
//! ```
//! use panomatch_imgproc::warp::{compose_affine, scale_matrix2d, transform_point, translation_matrix2d};
//!
//! let m = compose_affine(&scale_matrix2d(0.5, 0.5), &translation_matrix2d(-10.0, -20.0));
//! assert_eq!(transform_point(12.0, 20.0, &m), (1.0, 0.0));
//! ```

mod affine;

pub use affine::{
    compose_affine, invert_affine_transform, rotation_matrix2d, scale_matrix2d, transform_point,
    translation_matrix2d, warp_affine,
};
