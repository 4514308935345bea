use panomatch_image::ImageError;

/// An error type for the features module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FeatureError {
    /// The two descriptor sets do not have the same number of columns.
    #[error("Descriptor width mismatch: {0} != {1}")]
    DescriptorWidthMismatch(usize, usize),

    /// The descriptor data does not fit the requested shape.
    #[error("Descriptor data length ({0}) does not match {1} rows of width {2}")]
    InvalidDescriptorShape(usize, usize, usize),

    /// A descriptor backend returned a different number of rows than keypoints.
    #[error("Descriptor row count ({0}) does not match the keypoint count ({1})")]
    DescriptorCountMismatch(usize, usize),

    /// A match references a keypoint that does not exist.
    #[error("Match ({0}, {1}) is out of bounds for keypoint lists of length ({2}, {3})")]
    MatchIndexOutOfBounds(usize, usize, usize, usize),

    /// The homography contains NaN or infinite entries.
    #[error("Homography has non-finite entries")]
    NonFiniteHomography,

    /// An external detector or descriptor backend failed.
    #[error("External backend failed: {0}")]
    ExternalBackend(String),

    /// Error from the image operations.
    #[error(transparent)]
    Image(#[from] ImageError),
}
