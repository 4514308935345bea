use panomatch_image::Image;

use crate::padding::PaddingMode;

/// Kernel for bilinear interpolation
///
/// The value at `(u, v)` is blended from the four pixels around it. Neighbors that
/// fall outside the image are resolved with `border`; with [`PaddingMode::Constant`]
/// they read as zero, so a location far outside the image interpolates to zero.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `border` - How neighbors outside the image are read.
///
/// # Returns
///
/// The interpolated pixel values.
pub fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    border: PaddingMode,
) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());
    let mut pixel = [0.0; C];

    if rows == 0 || cols == 0 || !u.is_finite() || !v.is_finite() {
        return pixel;
    }

    let u0 = u.floor();
    let v0 = v.floor();

    let frac_u = u - u0;
    let frac_v = v - v0;

    let iu0 = u0 as isize;
    let iv0 = v0 as isize;

    let taps = [
        (iu0, iv0, (1.0 - frac_u) * (1.0 - frac_v)),
        (iu0.saturating_add(1), iv0, frac_u * (1.0 - frac_v)),
        (iu0, iv0.saturating_add(1), (1.0 - frac_u) * frac_v),
        (iu0.saturating_add(1), iv0.saturating_add(1), frac_u * frac_v),
    ];

    let data = image.as_slice();
    for (iu, iv, w) in taps {
        let (Some(x), Some(y)) = (border.map_index(iu, cols), border.map_index(iv, rows)) else {
            continue;
        };
        let base = (y * cols + x) * C;
        for (k, p) in pixel.iter_mut().enumerate() {
            *p += data[base + k] * w;
        }
    }

    pixel
}
