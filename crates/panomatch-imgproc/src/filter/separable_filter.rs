use panomatch_image::{Image, ImageError};
use rayon::prelude::*;

use crate::padding::PaddingMode;

/// A separable 2D filter that applies horizontal and vertical 1D correlations sequentially.
///
/// This struct caches the kernel data and precomputed offsets for efficient filtering.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
    border: PaddingMode,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32], border: PaddingMode) -> Self {
        let half_x = kernel_x.len() / 2;
        let half_y = kernel_y.len() / 2;

        let offsets_x = (0..kernel_x.len())
            .map(|i| i as isize - half_x as isize)
            .collect();

        let offsets_y = (0..kernel_y.len())
            .map(|i| i as isize - half_y as isize)
            .collect();

        Self {
            kernel_x,
            kernel_y,
            offsets_x,
            offsets_y,
            border,
        }
    }

    fn apply<const C: usize>(&self, src_data: &[f32], dst_data: &mut [f32], rows: usize, cols: usize) {
        let mut temp = vec![0.0f32; src_data.len()];

        // Horizontal
        temp.par_chunks_exact_mut(cols * C)
            .enumerate()
            .for_each(|(r, row_temp)| {
                let row_offset = r * cols * C;
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                        let Some(x) = self.border.map_index(c as isize + off, cols) else {
                            continue;
                        };
                        let idx = row_offset + x * C;
                        for (ch, acc_val) in acc.iter_mut().enumerate() {
                            *acc_val += src_data[idx + ch] * k;
                        }
                    }
                    row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
                }
            });

        // Vertical
        dst_data
            .par_chunks_exact_mut(cols * C)
            .enumerate()
            .for_each(|(r, row_dst)| {
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                        let Some(y) = self.border.map_index(r as isize + off, rows) else {
                            continue;
                        };
                        let idx = (y * cols + c) * C;
                        for (ch, acc_val) in acc.iter_mut().enumerate() {
                            *acc_val += temp[idx + ch] * k;
                        }
                    }
                    row_dst[c * C..(c + 1) * C].copy_from_slice(&acc);
                }
            });
    }
}

/// Apply a separable filter to an image.
///
/// The filter is a correlation: `dst[x] = sum_k kernel[k] * src[x + k - len / 2]`,
/// first along the rows with `kernel_x` and then along the columns with `kernel_y`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - How samples outside the image are read.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: PaddingMode,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.size().num_pixels() == 0 {
        return Ok(());
    }

    let filter = SeparableFilter::new(kernel_x, kernel_y, border);
    filter.apply::<C>(src.as_slice(), dst.as_slice_mut(), src.rows(), src.cols());

    Ok(())
}
