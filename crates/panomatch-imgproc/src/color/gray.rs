use crate::parallel;
use panomatch_image::{Image, ImageError};

/// Rec. 601 luma weights for the red, green and blue channels.
const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Convert an RGB8 image to a grayscale float image with values in [0, 1].
///
/// Each channel is scaled by `1 / 255` before the weighted sum
/// `Y = 0.299 * R + 0.587 * G + 0.114 * B`, so white maps to one and black to zero.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// PRECONDITION: `src` and `dst` must have the same size.
///
/// # Example
///
/// ```
/// use panomatch_image::Image;
/// use panomatch_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::from_size_val([4, 5].into(), 255).unwrap();
/// let mut gray = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert!(gray.as_slice().iter().all(|&v| (v - 1.0).abs() < 1e-6));
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let normalized = src.cast_and_scale::<f32>(1.0 / 255.0)?;
    parallel::par_iter_rows(&normalized, dst, |rgb, luma| {
        luma[0] = rgb.iter().zip(LUMA).map(|(&v, w)| w * v).sum();
    });

    Ok(())
}
