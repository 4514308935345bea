use panomatch_image::{Image, ImageError};

use super::{kernels, separable_filter};
use crate::padding::PaddingMode;

/// Blur an image using an isotropic gaussian filter.
///
/// The kernel size is derived from `sigma` with [`kernels::gaussian_kernel_size`] and
/// the borders are reflected.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `sigma` - The sigma of the gaussian kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    sigma: f32,
) -> Result<(), ImageError> {
    let kernel_size = kernels::gaussian_kernel_size(sigma);
    let kernel = kernels::gaussian_kernel_1d(kernel_size, sigma);
    separable_filter(src, dst, &kernel, &kernel, PaddingMode::Reflect)
}

/// Compute the first order image derivative in both x and y using a Sobel operator.
///
/// The kernels are not normalized: a unit step along x gives `dx = 4` at the step.
/// The borders are reflected.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dx` - The destination image for the horizontal derivative.
/// * `dy` - The destination image for the vertical derivative.
///
/// PRECONDITION: `src`, `dx` and `dy` must have the same shape.
pub fn spatial_gradient_float<const C: usize>(
    src: &Image<f32, C>,
    dx: &mut Image<f32, C>,
    dy: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    if src.size() != dx.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dx.cols(),
            dx.rows(),
        ));
    }

    if src.size() != dy.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dy.cols(),
            dy.rows(),
        ));
    }

    let (derivative, smoothing) = kernels::sobel_kernel_1d();

    separable_filter(src, dx, &derivative, &smoothing, PaddingMode::Reflect)?;
    separable_filter(src, dy, &smoothing, &derivative, PaddingMode::Reflect)?;

    Ok(())
}
