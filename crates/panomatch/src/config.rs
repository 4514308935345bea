use std::path::Path;

use panomatch_features::{descriptor::MopsConfig, responses::HarrisConfig};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Which keypoint detector to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// [`panomatch_features::DummyDetector`].
    Dummy,
    /// [`panomatch_features::HarrisDetector`].
    #[default]
    Harris,
    /// [`panomatch_features::FastDetector`].
    Fast,
}

/// Which descriptor to compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// [`panomatch_features::SimpleDescriptor`].
    Simple,
    /// [`panomatch_features::MopsDescriptor`].
    #[default]
    Mops,
    /// A caller supplied [`panomatch_features::ExternalDescriptor`].
    External,
}

/// Which matcher to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// [`panomatch_features::SsdMatcher`].
    Ssd,
    /// [`panomatch_features::RatioMatcher`].
    #[default]
    Ratio,
}

/// Configuration of a [`crate::FeaturePipeline`].
///
/// Missing fields take their default values, so `{}` is a valid configuration.
///
/// # Examples
///
/// ```
/// use panomatch::{DetectorKind, PipelineConfig};
///
/// let config = PipelineConfig::from_json_str(r#"{ "detector": "fast", "fast_threshold": 30 }"#).unwrap();
/// assert_eq!(config.detector, DetectorKind::Fast);
/// assert_eq!(config.fast_threshold, 30);
/// assert_eq!(config.harris.nms_radius, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// The keypoint detector.
    pub detector: DetectorKind,
    /// The descriptor.
    pub descriptor: DescriptorKind,
    /// The matcher.
    pub matcher: MatcherKind,
    /// Parameters of the Harris detector.
    pub harris: HarrisConfig,
    /// Parameters of the MOPS descriptor.
    pub mops: MopsConfig,
    /// Intensity threshold of the FAST detector.
    pub fast_threshold: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detector: DetectorKind::default(),
            descriptor: DescriptorKind::default(),
            matcher: MatcherKind::default(),
            harris: HarrisConfig::default(),
            mops: MopsConfig::default(),
            fast_threshold: 20,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize the configuration to pretty printed JSON.
    pub fn to_json_string(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() -> Result<(), PipelineError> {
        let config = PipelineConfig::from_json_str("{}")?;
        assert_eq!(config.detector, DetectorKind::Harris);
        assert_eq!(config.descriptor, DescriptorKind::Mops);
        assert_eq!(config.matcher, MatcherKind::Ratio);
        assert_eq!(config.harris, HarrisConfig::default());
        assert_eq!(config.mops, MopsConfig::default());
        assert_eq!(config.fast_threshold, 20);

        Ok(())
    }

    #[test]
    fn test_config_partial() -> Result<(), PipelineError> {
        let config = PipelineConfig::from_json_str(
            r#"{
                "detector": "dummy",
                "descriptor": "simple",
                "matcher": "ssd",
                "harris": { "k": 0.04 },
                "mops": { "window_size": 4 }
            }"#,
        )?;
        assert_eq!(config.detector, DetectorKind::Dummy);
        assert_eq!(config.descriptor, DescriptorKind::Simple);
        assert_eq!(config.matcher, MatcherKind::Ssd);
        assert_eq!(config.harris.k, 0.04);
        assert_eq!(config.harris.sigma, 0.5);
        assert_eq!(config.mops.window_size, 4);
        assert_eq!(config.mops.sample_spacing, 5.0);

        Ok(())
    }

    #[test]
    fn test_config_invalid() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{ "detector": "orb" }"#),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_file("/nonexistent/panomatch.json"),
            Err(PipelineError::Io(_))
        ));
    }

    #[test]
    fn test_config_file_roundtrip() -> Result<(), PipelineError> {
        let config = PipelineConfig {
            detector: DetectorKind::Fast,
            fast_threshold: 42,
            ..Default::default()
        };

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, config.to_json_string()?)?;

        assert_eq!(PipelineConfig::from_json_file(&path)?, config);

        Ok(())
    }
}
