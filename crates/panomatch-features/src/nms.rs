use panomatch_image::{Image, ImageError};
use rayon::prelude::*;

/// Mark the pixels that equal the maximum of their square neighborhood.
///
/// The neighborhood spans `2 * radius + 1` pixels in each direction and is clipped at
/// the image borders, so border pixels only compete with the pixels that exist.
/// Ties are kept: every pixel equal to the window maximum is marked.
///
/// The maximum is computed separably, first along the rows and then along the columns,
/// which gives the same result as the full window.
///
/// # Arguments
///
/// * `src` - The response image with shape (H, W).
/// * `dst` - The destination mask with shape (H, W).
/// * `radius` - Half size of the window, `3` for a 7x7 window.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn local_maxima(
    src: &Image<f32, 1>,
    dst: &mut Image<bool, 1>,
    radius: usize,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let src_data = src.as_slice();

    let mut row_max = vec![0.0f32; src_data.len()];
    row_max
        .par_chunks_exact_mut(cols)
        .zip(src_data.par_chunks_exact(cols))
        .for_each(|(max_row, src_row)| {
            for (x, max_pixel) in max_row.iter_mut().enumerate() {
                let lo = x.saturating_sub(radius);
                let hi = (x + radius).min(cols - 1);
                *max_pixel = src_row[lo..=hi]
                    .iter()
                    .fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
            }
        });

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(src_data.par_chunks_exact(cols))
        .enumerate()
        .for_each(|(y, (dst_row, src_row))| {
            let lo = y.saturating_sub(radius);
            let hi = (y + radius).min(rows - 1);
            for (x, (is_max, &v)) in dst_row.iter_mut().zip(src_row.iter()).enumerate() {
                let window_max = (lo..=hi)
                    .map(|r| row_max[r * cols + x])
                    .fold(f32::NEG_INFINITY, f32::max);
                *is_max = v == window_max;
            }
        });

    Ok(())
}
