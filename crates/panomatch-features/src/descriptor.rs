use panomatch_image::{Image, ImageSize};
use panomatch_imgproc::{
    color::gray_from_rgb_u8,
    filter::gaussian_blur,
    padding::PaddingMode,
    warp::{compose_affine, rotation_matrix2d, scale_matrix2d, translation_matrix2d, warp_affine},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{descriptor_set::DescriptorSet, error::FeatureError, keypoint::Keypoint};

/// Patches whose variance falls below this value normalize to all zeros.
pub const MIN_PATCH_VARIANCE: f64 = 1e-10;

/// Side of the square window sampled by [`SimpleDescriptor`].
pub const SIMPLE_WINDOW_SIZE: usize = 5;

/// Computes one descriptor row per keypoint.
pub trait FeatureDescriptor: Send + Sync {
    /// The number of columns of every descriptor.
    fn width(&self) -> usize;

    /// Describe `keypoints` in `image`.
    ///
    /// The result has one row per keypoint, in the same order.
    fn describe(
        &self,
        image: &Image<u8, 3>,
        keypoints: &[Keypoint],
    ) -> Result<DescriptorSet, FeatureError>;
}

fn grayscale(image: &Image<u8, 3>) -> Result<Image<f32, 1>, FeatureError> {
    let mut gray = Image::from_size_val(image.size(), 0.0f32)?;
    gray_from_rgb_u8(image, &mut gray)?;
    Ok(gray)
}

/// Raw grayscale intensities of the 5x5 window centered on each keypoint.
///
/// Keypoint coordinates are truncated to integers. Samples outside the image are zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleDescriptor;

impl FeatureDescriptor for SimpleDescriptor {
    fn width(&self) -> usize {
        SIMPLE_WINDOW_SIZE * SIMPLE_WINDOW_SIZE
    }

    fn describe(
        &self,
        image: &Image<u8, 3>,
        keypoints: &[Keypoint],
    ) -> Result<DescriptorSet, FeatureError> {
        let gray = grayscale(image)?;
        let size = gray.size();
        let half = (SIMPLE_WINDOW_SIZE / 2) as i64;

        let mut data = Vec::with_capacity(keypoints.len() * self.width());
        for kp in keypoints {
            let (cx, cy) = (kp.x as i64, kp.y as i64);
            for y in cy - half..=cy + half {
                for x in cx - half..=cx + half {
                    let v = if size.contains(x, y) {
                        gray.as_slice()[y as usize * size.width + x as usize]
                    } else {
                        0.0
                    };
                    data.push(v);
                }
            }
        }

        DescriptorSet::new(keypoints.len(), self.width(), data)
    }
}

/// Parameters of the MOPS descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MopsConfig {
    /// Side of the square output patch.
    pub window_size: usize,
    /// Distance in source pixels between two patch samples.
    pub sample_spacing: f32,
    /// Sigma of the blur applied to the image before sampling.
    pub blur_sigma: f32,
}

impl Default for MopsConfig {
    fn default() -> Self {
        Self {
            window_size: 8,
            sample_spacing: 5.0,
            blur_sigma: 0.5,
        }
    }
}

/// Affine map from source pixels to the descriptor patch of `keypoint`.
///
/// The keypoint is moved to the origin, rotated by `-angle` so that its orientation
/// points along `+x`, scaled by `1 / sample_spacing` and moved to the patch center.
pub fn mops_transform(keypoint: &Keypoint, config: &MopsConfig) -> [f32; 6] {
    let center = (config.window_size / 2) as f32;

    let to_origin = translation_matrix2d(-keypoint.x, -keypoint.y);
    let rotate = rotation_matrix2d(-keypoint.angle);
    let scale = scale_matrix2d(1.0 / config.sample_spacing, 1.0 / config.sample_spacing);
    let to_center = translation_matrix2d(center, center);

    compose_affine(
        &to_center,
        &compose_affine(&scale, &compose_affine(&rotate, &to_origin)),
    )
}

/// Shift a patch to zero mean and scale it to unit population standard deviation.
///
/// Returns all zeros when the variance is below [`MIN_PATCH_VARIANCE`].
pub fn normalize_patch(patch: &[f32]) -> Vec<f32> {
    if patch.is_empty() {
        return Vec::new();
    }

    let n = patch.len() as f64;
    let mean = patch.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = patch
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    if variance < MIN_PATCH_VARIANCE {
        return vec![0.0; patch.len()];
    }

    let std = variance.sqrt();
    patch
        .iter()
        .map(|&v| ((v as f64 - mean) / std) as f32)
        .collect()
}

/// Multi-scale oriented patches.
///
/// A blurred, rotation normalized and subsampled `window_size x window_size` patch,
/// normalized to zero mean and unit variance.
#[derive(Clone, Debug, Default)]
pub struct MopsDescriptor {
    config: MopsConfig,
}

impl MopsDescriptor {
    /// Create a descriptor with the given parameters.
    pub fn new(config: MopsConfig) -> Self {
        Self { config }
    }

    /// The descriptor parameters.
    pub fn config(&self) -> &MopsConfig {
        &self.config
    }
}

impl FeatureDescriptor for MopsDescriptor {
    fn width(&self) -> usize {
        self.config.window_size * self.config.window_size
    }

    fn describe(
        &self,
        image: &Image<u8, 3>,
        keypoints: &[Keypoint],
    ) -> Result<DescriptorSet, FeatureError> {
        let gray = grayscale(image)?;
        let mut blurred = Image::from_size_val(gray.size(), 0.0f32)?;
        gaussian_blur(&gray, &mut blurred, self.config.blur_sigma)?;

        let patch_size = ImageSize {
            width: self.config.window_size,
            height: self.config.window_size,
        };
        let rows = keypoints
            .par_iter()
            .map(|kp| {
                let m = mops_transform(kp, &self.config);
                let mut patch = Image::<f32, 1>::from_size_val(patch_size, 0.0)?;
                warp_affine(&blurred, &mut patch, &m, PaddingMode::Constant)?;
                Ok(normalize_patch(patch.as_slice()))
            })
            .collect::<Result<Vec<_>, FeatureError>>()?;

        DescriptorSet::from_rows(self.width(), rows)
    }
}

/// The callable behind an [`ExternalDescriptor`].
///
/// Returning `Ok(None)` means the backend produced no descriptors at all.
pub type DescriptorBackend = Box<
    dyn Fn(&Image<u8, 3>, &[Keypoint]) -> Result<Option<DescriptorSet>, FeatureError>
        + Send
        + Sync,
>;

/// Descriptors computed by a caller supplied backend of known width.
pub struct ExternalDescriptor {
    width: usize,
    backend: DescriptorBackend,
}

impl ExternalDescriptor {
    /// Wrap `backend`, which must produce descriptors of `width` columns.
    pub fn new(width: usize, backend: DescriptorBackend) -> Self {
        Self { width, backend }
    }

    /// Wrap a closure, boxing it as the backend.
    pub fn from_fn<F>(width: usize, backend: F) -> Self
    where
        F: Fn(&Image<u8, 3>, &[Keypoint]) -> Result<Option<DescriptorSet>, FeatureError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(width, Box::new(backend))
    }
}

impl std::fmt::Debug for ExternalDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalDescriptor")
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl FeatureDescriptor for ExternalDescriptor {
    fn width(&self) -> usize {
        self.width
    }

    fn describe(
        &self,
        image: &Image<u8, 3>,
        keypoints: &[Keypoint],
    ) -> Result<DescriptorSet, FeatureError> {
        let Some(descriptors) = (self.backend)(image, keypoints)? else {
            log::warn!(
                "external descriptor produced nothing for {} keypoints",
                keypoints.len()
            );
            return Ok(DescriptorSet::empty(self.width));
        };

        if descriptors.cols() != self.width {
            return Err(FeatureError::DescriptorWidthMismatch(
                descriptors.cols(),
                self.width,
            ));
        }

        if descriptors.is_empty() {
            return Ok(descriptors);
        }

        if descriptors.rows() != keypoints.len() {
            return Err(FeatureError::DescriptorCountMismatch(
                descriptors.rows(),
                keypoints.len(),
            ));
        }

        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use panomatch_imgproc::warp::transform_point;

    fn ramp_image(size: usize, along_x: bool) -> Result<Image<u8, 3>, FeatureError> {
        let data = (0..size * size)
            .flat_map(|i| {
                let t = if along_x { i % size } else { i / size };
                [(t * 3) as u8; 3]
            })
            .collect();
        Ok(Image::new([size, size].into(), data)?)
    }

    #[test]
    fn test_simple_descriptor() -> Result<(), FeatureError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };
        let image = Image::<u8, 3>::new(size, (0..75).map(|i| (i / 3 * 10) as u8).collect())?;
        let gray = grayscale(&image)?;

        let keypoints = [
            Keypoint::new(2.0, 2.0, 0.0, 1.0),
            Keypoint::new(2.7, 2.2, 0.0, 1.0),
            Keypoint::new(0.0, 0.0, 0.0, 1.0),
        ];
        let set = SimpleDescriptor.describe(&image, &keypoints)?;
        assert_eq!(set.rows(), 3);
        assert_eq!(set.cols(), 25);

        assert_eq!(set.row(0), Some(gray.as_slice()));
        assert_eq!(set.row(1), set.row(0));

        let corner = set.row(2).unwrap_or_default();
        // the top two rows and left two columns fall outside the image
        for (i, &v) in corner.iter().enumerate() {
            let (dx, dy) = (i % 5, i / 5);
            if dx < 2 || dy < 2 {
                assert_eq!(v, 0.0);
            } else {
                assert_eq!(v, gray.get_pixel(dx - 2, dy - 2, 0)?);
            }
        }

        Ok(())
    }

    #[test]
    fn test_mops_transform() {
        let config = MopsConfig::default();

        let m = mops_transform(&Keypoint::new(20.0, 30.0, 0.0, 1.0), &config);
        let (u, v) = transform_point(20.0, 30.0, &m);
        assert_relative_eq!(u, 4.0, epsilon = 1e-5);
        assert_relative_eq!(v, 4.0, epsilon = 1e-5);
        let (u, v) = transform_point(25.0, 30.0, &m);
        assert_relative_eq!(u, 5.0, epsilon = 1e-5);
        assert_relative_eq!(v, 4.0, epsilon = 1e-5);

        // the keypoint orientation maps onto +x
        let m = mops_transform(&Keypoint::new(20.0, 30.0, 90.0, 1.0), &config);
        let (u, v) = transform_point(20.0, 35.0, &m);
        assert_relative_eq!(u, 5.0, epsilon = 1e-5);
        assert_relative_eq!(v, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_patch() {
        let patch: Vec<f32> = (0..64).map(|v| v as f32).collect();
        let normalized = normalize_patch(&patch);

        let mean = normalized.iter().sum::<f32>() / 64.0;
        let var = normalized.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / 64.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-5);
        assert_relative_eq!(var, 1.0, epsilon = 1e-5);

        assert_eq!(normalize_patch(&[0.3; 64]), vec![0.0; 64]);
        assert!(normalize_patch(&[]).is_empty());
    }

    #[test]
    fn test_mops_flat_image() -> Result<(), FeatureError> {
        let image = Image::<u8, 3>::from_size_val([64, 64].into(), 77)?;
        let keypoints = [Keypoint::new(32.0, 32.0, 30.0, 1.0)];

        let set = MopsDescriptor::default().describe(&image, &keypoints)?;
        assert_eq!(set.cols(), 64);
        assert!(set.as_slice().iter().all(|&v| v == 0.0));

        Ok(())
    }

    #[test]
    fn test_mops_ramp() -> Result<(), FeatureError> {
        let image = ramp_image(64, true)?;
        let keypoints = [Keypoint::new(32.0, 32.0, 0.0, 1.0)];

        let set = MopsDescriptor::default().describe(&image, &keypoints)?;
        let desc = set.row(0).unwrap_or_default();
        assert_eq!(desc.len(), 64);

        for row in desc.chunks_exact(8) {
            assert!(row.windows(2).all(|w| w[1] > w[0]));
            for (a, b) in row.iter().zip(desc[..8].iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-4);
            }
        }

        let mean = desc.iter().sum::<f32>() / 64.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-5);

        Ok(())
    }

    #[test]
    fn test_mops_rotation_normalized() -> Result<(), FeatureError> {
        let horizontal = ramp_image(64, true)?;
        let vertical = ramp_image(64, false)?;
        let mops = MopsDescriptor::default();

        let a = mops.describe(&horizontal, &[Keypoint::new(32.0, 32.0, 0.0, 1.0)])?;
        let b = mops.describe(&vertical, &[Keypoint::new(32.0, 32.0, 90.0, 1.0)])?;

        for (va, vb) in a.as_slice().iter().zip(b.as_slice()) {
            assert_relative_eq!(va, vb, epsilon = 1e-3);
        }

        Ok(())
    }

    #[test]
    fn test_mops_empty_keypoints() -> Result<(), FeatureError> {
        let image = ramp_image(16, true)?;
        let set = MopsDescriptor::default().describe(&image, &[])?;
        assert!(set.is_empty());
        assert_eq!(set.cols(), 64);

        Ok(())
    }

    #[test]
    fn test_external_descriptor() -> Result<(), FeatureError> {
        let image = ramp_image(8, true)?;
        let keypoints = [Keypoint::new(1.0, 1.0, 0.0, 1.0)];

        let silent = ExternalDescriptor::from_fn(32, |_, _| Ok(None));
        let set = silent.describe(&image, &keypoints)?;
        assert!(set.is_empty());
        assert_eq!(set.cols(), 32);

        let ones = ExternalDescriptor::from_fn(4, |_, kps| {
            Ok(Some(DescriptorSet::new(kps.len(), 4, vec![1.0; kps.len() * 4])?))
        });
        assert_eq!(ones.describe(&image, &keypoints)?.as_slice(), &[1.0; 4]);

        let wrong = ExternalDescriptor::from_fn(8, |_, kps| {
            Ok(Some(DescriptorSet::new(kps.len(), 4, vec![1.0; kps.len() * 4])?))
        });
        assert_eq!(
            wrong.describe(&image, &keypoints),
            Err(FeatureError::DescriptorWidthMismatch(4, 8))
        );

        let wrong_empty =
            ExternalDescriptor::from_fn(8, |_, _| Ok(Some(DescriptorSet::empty(16))));
        assert_eq!(
            wrong_empty.describe(&image, &keypoints),
            Err(FeatureError::DescriptorWidthMismatch(16, 8))
        );

        let empty = ExternalDescriptor::from_fn(8, |_, _| Ok(Some(DescriptorSet::empty(8))));
        assert!(empty.describe(&image, &keypoints)?.is_empty());

        let failing = ExternalDescriptor::from_fn(8, |_, _| {
            Err(FeatureError::ExternalBackend("offline".to_string()))
        });
        assert!(failing.describe(&image, &keypoints).is_err());

        Ok(())
    }
}
