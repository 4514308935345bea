use panomatch_features::{
    evaluate::evaluate_matches, DescriptorSet, DummyDetector, ExternalDescriptor, FastDetector,
    FeatureDescriptor, FeatureError, FeatureMatcher, HarrisDetector, Keypoint, KeypointDetector,
    Match, MopsDescriptor, RatioMatcher, SimpleDescriptor, SsdMatcher,
};
use panomatch_image::Image;

use crate::{
    config::{DescriptorKind, DetectorKind, MatcherKind, PipelineConfig},
    error::PipelineError,
};

/// Keypoints of one image and their descriptors, row `i` describing keypoint `i`.
#[derive(Clone, Debug)]
pub struct ImageFeatures {
    /// The detected keypoints.
    pub keypoints: Vec<Keypoint>,
    /// One descriptor per keypoint.
    pub descriptors: DescriptorSet,
}

/// Features of two images and the matches from the first to the second.
#[derive(Clone, Debug)]
pub struct PairResult {
    /// Features of the query image.
    pub first: ImageFeatures,
    /// Features of the train image.
    pub second: ImageFeatures,
    /// One match per query descriptor.
    pub matches: Vec<Match>,
}

impl PairResult {
    /// Mean reprojection error of the matches under the ground truth homography `h`.
    pub fn evaluate(&self, h: &[f32; 9]) -> Result<f32, FeatureError> {
        evaluate_matches(
            &self.first.keypoints,
            &self.second.keypoints,
            &self.matches,
            h,
        )
    }
}

/// A detector, a descriptor and a matcher run in sequence.
pub struct FeaturePipeline {
    detector: Box<dyn KeypointDetector>,
    descriptor: Box<dyn FeatureDescriptor>,
    matcher: Box<dyn FeatureMatcher>,
}

impl FeaturePipeline {
    /// Assemble a pipeline from its stages.
    pub fn new(
        detector: Box<dyn KeypointDetector>,
        descriptor: Box<dyn FeatureDescriptor>,
        matcher: Box<dyn FeatureMatcher>,
    ) -> Self {
        Self {
            detector,
            descriptor,
            matcher,
        }
    }

    /// Build the stages selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ExternalDescriptorKind`] when the config selects the external
    /// descriptor. Use [`FeaturePipeline::from_config_with_external`] instead.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Self::build(config, None)
    }

    /// Build the stages selected by `config`, using `external` as the external descriptor.
    pub fn from_config_with_external(
        config: &PipelineConfig,
        external: ExternalDescriptor,
    ) -> Result<Self, PipelineError> {
        Self::build(config, Some(external))
    }

    fn build(
        config: &PipelineConfig,
        external: Option<ExternalDescriptor>,
    ) -> Result<Self, PipelineError> {
        let detector: Box<dyn KeypointDetector> = match config.detector {
            DetectorKind::Dummy => Box::new(DummyDetector),
            DetectorKind::Harris => Box::new(HarrisDetector::new(config.harris)),
            DetectorKind::Fast => Box::new(FastDetector::new(config.fast_threshold)),
        };

        let descriptor: Box<dyn FeatureDescriptor> = match (config.descriptor, external) {
            (DescriptorKind::Simple, _) => Box::new(SimpleDescriptor),
            (DescriptorKind::Mops, _) => Box::new(MopsDescriptor::new(config.mops)),
            (DescriptorKind::External, Some(external)) => Box::new(external),
            (DescriptorKind::External, None) => return Err(PipelineError::ExternalDescriptorKind),
        };

        let matcher: Box<dyn FeatureMatcher> = match config.matcher {
            MatcherKind::Ssd => Box::new(SsdMatcher),
            MatcherKind::Ratio => Box::new(RatioMatcher),
        };

        log::debug!(
            "pipeline: detector {:?}, descriptor {:?} ({} columns), matcher {:?}",
            config.detector,
            config.descriptor,
            descriptor.width(),
            config.matcher
        );

        Ok(Self::new(detector, descriptor, matcher))
    }

    /// Width of the descriptors this pipeline produces.
    pub fn descriptor_width(&self) -> usize {
        self.descriptor.width()
    }

    /// Detect and describe the keypoints of one image.
    pub fn extract(&self, image: &Image<u8, 3>) -> Result<ImageFeatures, PipelineError> {
        let keypoints = self.detector.detect(image)?;
        let descriptors = self.descriptor.describe(image, &keypoints)?;
        log::debug!(
            "extract: {} keypoints, {}x{} descriptors",
            keypoints.len(),
            descriptors.rows(),
            descriptors.cols()
        );

        Ok(ImageFeatures {
            keypoints,
            descriptors,
        })
    }

    /// Extract the features of both images and match the first against the second.
    pub fn match_pair(
        &self,
        first: &Image<u8, 3>,
        second: &Image<u8, 3>,
    ) -> Result<PairResult, PipelineError> {
        let first = self.extract(first)?;
        let second = self.extract(second)?;
        let matches = self
            .matcher
            .match_features(&first.descriptors, &second.descriptors)?;
        log::debug!("match_pair: {} matches", matches.len());

        Ok(PairResult {
            first,
            second,
            matches,
        })
    }
}
