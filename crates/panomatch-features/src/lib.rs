#![deny(missing_docs)]
//! Keypoint detection, description and matching for image alignment.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`responses::harris_response`] scores every pixel and records its gradient orientation.
//! 2. [`nms::local_maxima`] keeps the pixels that are the maximum of their neighborhood.
//! 3. [`detector::extract_keypoints`] turns the surviving pixels into [`Keypoint`]s.
//! 4. A [`FeatureDescriptor`] samples a patch around each keypoint.
//! 5. A [`FeatureMatcher`] pairs the descriptors of two images.
//! 6. [`evaluate::evaluate_matches`] scores the pairs against a known homography.

/// Descriptor extraction around keypoints.
pub mod descriptor;

/// Dense descriptor storage.
pub mod descriptor_set;

/// Keypoint detectors.
pub mod detector;

/// Error types for the features module.
pub mod error;

/// Ground truth evaluation of matches.
pub mod evaluate;

/// Keypoint and match records.
pub mod keypoint;

/// Descriptor matchers.
pub mod matcher;

/// Non-maximum suppression.
pub mod nms;

/// Per-pixel corner responses.
pub mod responses;

pub use descriptor::{ExternalDescriptor, FeatureDescriptor, MopsDescriptor, SimpleDescriptor};
pub use descriptor_set::DescriptorSet;
pub use detector::{DummyDetector, FastDetector, HarrisDetector, KeypointDetector};
pub use error::FeatureError;
pub use keypoint::{Keypoint, Match, KEYPOINT_SIZE};
pub use matcher::{FeatureMatcher, RatioMatcher, SsdMatcher};
