use image::{imageops, RgbImage};
use imageproc::corners::corners_fast9;
use panomatch_image::{Image, ImageError};
use panomatch_imgproc::color::gray_from_rgb_u8;

use crate::{
    error::FeatureError,
    keypoint::Keypoint,
    nms::local_maxima,
    responses::{harris_response, HarrisConfig},
};

/// A source of keypoints for an RGB image.
pub trait KeypointDetector: Send + Sync {
    /// Detect the keypoints of `image`, in row-major scan order.
    fn detect(&self, image: &Image<u8, 3>) -> Result<Vec<Keypoint>, FeatureError>;
}

/// Collect the marked pixels of a local maxima mask into keypoints.
///
/// Keypoints are emitted in row-major order with `x = col`, `y = row`, the strength as
/// response and the orientation as angle.
///
/// # Arguments
///
/// * `mask` - The local maxima mask with shape (H, W).
/// * `strength` - The corner strength with shape (H, W).
/// * `orientation` - The gradient orientation in degrees with shape (H, W).
///
/// PRECONDITION: all three images must have the same shape.
pub fn extract_keypoints(
    mask: &Image<bool, 1>,
    strength: &Image<f32, 1>,
    orientation: &Image<f32, 1>,
) -> Result<Vec<Keypoint>, ImageError> {
    for size in [strength.size(), orientation.size()] {
        if mask.size() != size {
            return Err(ImageError::InvalidImageSize(
                mask.cols(),
                mask.rows(),
                size.width,
                size.height,
            ));
        }
    }

    let cols = mask.cols();
    let keypoints = mask
        .as_slice()
        .iter()
        .zip(strength.as_slice())
        .zip(orientation.as_slice())
        .enumerate()
        .filter(|(_, ((&is_max, _), _))| is_max)
        .map(|(i, ((_, &response), &angle))| {
            Keypoint::new((i % cols) as f32, (i / cols) as f32, angle, response)
        })
        .collect();

    Ok(keypoints)
}

/// Harris corners filtered by non-maximum suppression.
#[derive(Clone, Debug, Default)]
pub struct HarrisDetector {
    config: HarrisConfig,
}

impl HarrisDetector {
    /// Create a detector with the given parameters.
    pub fn new(config: HarrisConfig) -> Self {
        Self { config }
    }

    /// The detector parameters.
    pub fn config(&self) -> &HarrisConfig {
        &self.config
    }
}

impl KeypointDetector for HarrisDetector {
    fn detect(&self, image: &Image<u8, 3>) -> Result<Vec<Keypoint>, FeatureError> {
        let mut gray = Image::from_size_val(image.size(), 0.0f32)?;
        gray_from_rgb_u8(image, &mut gray)?;

        let mut strength = Image::from_size_val(image.size(), 0.0f32)?;
        let mut orientation = Image::from_size_val(image.size(), 0.0f32)?;
        harris_response(&gray, &mut strength, &mut orientation, &self.config)?;

        let mut mask = Image::from_size_val(image.size(), false)?;
        local_maxima(&strength, &mut mask, self.config.nms_radius)?;

        let keypoints = extract_keypoints(&mask, &strength, &orientation)?;
        log::debug!(
            "harris: {} keypoints in {}",
            keypoints.len(),
            image.size()
        );

        Ok(keypoints)
    }
}

/// Marks every pixel whose channel sum is `1` modulo `100`.
///
/// Only useful to exercise the rest of the pipeline with a deterministic set of points.
#[derive(Clone, Copy, Debug, Default)]
pub struct DummyDetector;

impl KeypointDetector for DummyDetector {
    fn detect(&self, image: &Image<u8, 3>) -> Result<Vec<Keypoint>, FeatureError> {
        let cols = image.cols();
        let keypoints = image
            .as_slice()
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, px)| px.iter().map(|&v| v as u32).sum::<u32>() % 100 == 1)
            .map(|(i, _)| Keypoint::new((i % cols) as f32, (i / cols) as f32, 0.0, 10.0))
            .collect();

        Ok(keypoints)
    }
}

/// FAST-9 corners computed by `imageproc`.
///
/// The corners carry no orientation, so every keypoint has angle `0` and the FAST score
/// as response.
#[derive(Clone, Copy, Debug)]
pub struct FastDetector {
    threshold: u8,
}

impl FastDetector {
    /// Create a detector with the given intensity threshold.
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl Default for FastDetector {
    fn default() -> Self {
        Self { threshold: 20 }
    }
}

impl KeypointDetector for FastDetector {
    fn detect(&self, image: &Image<u8, 3>) -> Result<Vec<Keypoint>, FeatureError> {
        let rgb = RgbImage::from_raw(
            image.cols() as u32,
            image.rows() as u32,
            image.as_slice().to_vec(),
        )
        .ok_or_else(|| FeatureError::ExternalBackend("invalid rgb buffer".to_string()))?;
        let gray = imageops::grayscale(&rgb);

        let mut corners = corners_fast9(&gray, self.threshold);
        corners.sort_by_key(|c| (c.y, c.x));

        let keypoints: Vec<Keypoint> = corners
            .into_iter()
            .map(|c| Keypoint::new(c.x as f32, c.y as f32, 0.0, c.score))
            .collect();
        log::debug!("fast: {} keypoints in {}", keypoints.len(), image.size());

        Ok(keypoints)
    }
}
