#![deny(missing_docs)]
#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

/// Pipeline configuration loaded from JSON.
pub mod config;

/// Error types for the pipeline.
pub mod error;

/// Detection, description and matching wired together.
pub mod pipeline;

pub use config::{DescriptorKind, DetectorKind, MatcherKind, PipelineConfig};
pub use error::PipelineError;
pub use pipeline::{FeaturePipeline, ImageFeatures, PairResult};

#[doc(inline)]
pub use panomatch_features as features;

#[doc(inline)]
pub use panomatch_image as image;

#[doc(inline)]
pub use panomatch_imgproc as imgproc;
