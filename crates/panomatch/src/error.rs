use panomatch_features::FeatureError;
use panomatch_image::ImageError;

/// An error type for the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A pipeline stage failed.
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// The external descriptor was selected but no backend was supplied.
    #[error("The external descriptor needs a backend")]
    ExternalDescriptorKind,
}

impl From<ImageError> for PipelineError {
    fn from(e: ImageError) -> Self {
        PipelineError::Feature(FeatureError::Image(e))
    }
}
