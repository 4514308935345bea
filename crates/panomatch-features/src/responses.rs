use panomatch_image::{Image, ImageError};
use panomatch_imgproc::{
    filter::{gaussian_blur, spatial_gradient_float},
    parallel,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters of the Harris corner response.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarrisConfig {
    /// Weight of the squared trace in `det - k * trace^2`.
    pub k: f32,
    /// Sigma of the gaussian window applied to the gradient products.
    pub sigma: f32,
    /// Half size of the non-maximum suppression window.
    pub nms_radius: usize,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            k: 0.1,
            sigma: 0.5,
            nms_radius: 3,
        }
    }
}

/// Compute the Harris corner strength and gradient orientation of a grayscale image.
///
/// The gradients are taken with an unnormalized Sobel operator. The structure tensor
/// entries `dx^2`, `dy^2` and `dx * dy` are smoothed with a gaussian of `config.sigma`
/// and combined into `R = det - k * trace^2`. Negative values are kept.
///
/// The orientation is `atan2(dy, dx)` of the raw gradient, in degrees within `(-180, 180]`.
///
/// # Arguments
///
/// * `src` - The grayscale source image with shape (H, W).
/// * `strength` - The destination corner strength with shape (H, W).
/// * `orientation` - The destination orientation with shape (H, W).
/// * `config` - The Harris parameters.
///
/// PRECONDITION: `src`, `strength` and `orientation` must have the same shape.
pub fn harris_response(
    src: &Image<f32, 1>,
    strength: &mut Image<f32, 1>,
    orientation: &mut Image<f32, 1>,
    config: &HarrisConfig,
) -> Result<(), ImageError> {
    for dst in [&*strength, &*orientation] {
        if src.size() != dst.size() {
            return Err(ImageError::InvalidImageSize(
                src.cols(),
                src.rows(),
                dst.cols(),
                dst.rows(),
            ));
        }
    }

    let mut dx = Image::from_size_val(src.size(), 0.0f32)?;
    let mut dy = Image::from_size_val(src.size(), 0.0f32)?;
    spatial_gradient_float(src, &mut dx, &mut dy)?;

    let mut dx2 = Image::from_size_val(src.size(), 0.0f32)?;
    let mut dy2 = Image::from_size_val(src.size(), 0.0f32)?;
    let mut dxy = Image::from_size_val(src.size(), 0.0f32)?;
    parallel::par_iter_rows_val_two(&dx, &dx, &mut dx2, |a, b, out| *out = a * b);
    parallel::par_iter_rows_val_two(&dy, &dy, &mut dy2, |a, b, out| *out = a * b);
    parallel::par_iter_rows_val_two(&dx, &dy, &mut dxy, |a, b, out| *out = a * b);

    let mut a = Image::from_size_val(src.size(), 0.0f32)?;
    let mut b = Image::from_size_val(src.size(), 0.0f32)?;
    let mut c = Image::from_size_val(src.size(), 0.0f32)?;
    gaussian_blur(&dx2, &mut a, config.sigma)?;
    gaussian_blur(&dy2, &mut b, config.sigma)?;
    gaussian_blur(&dxy, &mut c, config.sigma)?;

    let k = config.k;
    strength
        .as_slice_mut()
        .par_iter_mut()
        .zip(a.as_slice().par_iter())
        .zip(b.as_slice().par_iter())
        .zip(c.as_slice().par_iter())
        .for_each(|(((r, &sxx), &syy), &sxy)| {
            let det = sxx * syy - sxy * sxy;
            let trace = sxx + syy;
            *r = det - k * trace * trace;
        });

    parallel::par_iter_rows_val_two(&dx, &dy, orientation, |gx, gy, angle| {
        let deg = gy.atan2(*gx).to_degrees();
        *angle = if deg <= -180.0 { deg + 360.0 } else { deg };
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use panomatch_image::ImageSize;

    fn corner_image() -> Result<Image<f32, 1>, ImageError> {
        // bright quadrant for x >= 10 and y >= 10
        let size = ImageSize {
            width: 20,
            height: 20,
        };
        let data = (0..size.num_pixels())
            .map(|i| {
                let (x, y) = (i % 20, i / 20);
                if x >= 10 && y >= 10 {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        Image::new(size, data)
    }

    #[test]
    fn test_harris_flat_image() -> Result<(), ImageError> {
        let size = [8, 6].into();
        let src = Image::<f32, 1>::from_size_val(size, 0.7)?;
        let mut strength = Image::from_size_val(size, 1.0)?;
        let mut orientation = Image::from_size_val(size, 1.0)?;

        harris_response(&src, &mut strength, &mut orientation, &HarrisConfig::default())?;

        assert!(strength.as_slice().iter().all(|&v| v == 0.0));
        assert!(orientation.as_slice().iter().all(|&v| v == 0.0));

        Ok(())
    }

    #[test]
    fn test_harris_corner() -> Result<(), ImageError> {
        let src = corner_image()?;
        let mut strength = Image::from_size_val(src.size(), 0.0)?;
        let mut orientation = Image::from_size_val(src.size(), 0.0)?;

        harris_response(&src, &mut strength, &mut orientation, &HarrisConfig::default())?;

        let (argmax, max) = strength
            .as_slice()
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        let (x, y) = (argmax % 20, argmax / 20);
        assert!(max > 0.0);
        assert!((8..=11).contains(&x), "x = {x}");
        assert!((8..=11).contains(&y), "y = {y}");

        // flat region
        assert_eq!(strength.get_pixel(3, 3, 0)?, 0.0);
        // straight edge
        assert!(strength.get_pixel(10, 15, 0)? < 0.0);

        Ok(())
    }

    #[test]
    fn test_harris_orientation() -> Result<(), ImageError> {
        let src = corner_image()?;
        let mut strength = Image::from_size_val(src.size(), 0.0)?;
        let mut orientation = Image::from_size_val(src.size(), 0.0)?;

        harris_response(&src, &mut strength, &mut orientation, &HarrisConfig::default())?;

        // vertical edge, intensity grows with x
        assert_relative_eq!(orientation.get_pixel(10, 15, 0)?, 0.0, epsilon = 1e-4);
        // horizontal edge, intensity grows with y
        assert_relative_eq!(orientation.get_pixel(15, 10, 0)?, 90.0, epsilon = 1e-4);
        // diagonal at the corner
        assert_relative_eq!(orientation.get_pixel(10, 10, 0)?, 45.0, epsilon = 1e-4);

        assert!(orientation
            .as_slice()
            .iter()
            .all(|&a| a > -180.0 && a <= 180.0));

        Ok(())
    }

    #[test]
    fn test_harris_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([4, 4].into(), 0.0)?;
        let mut strength = Image::from_size_val([4, 4].into(), 0.0)?;
        let mut orientation = Image::from_size_val([4, 3].into(), 0.0)?;

        assert_eq!(
            harris_response(&src, &mut strength, &mut orientation, &HarrisConfig::default()),
            Err(ImageError::InvalidImageSize(4, 4, 4, 3))
        );

        Ok(())
    }
}
