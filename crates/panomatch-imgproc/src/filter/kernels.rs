/// Number of standard deviations covered by a gaussian kernel on each side.
pub const GAUSSIAN_TRUNCATE: f32 = 4.0;

/// Compute the size of a gaussian kernel for the given sigma.
///
/// The kernel radius is `floor(GAUSSIAN_TRUNCATE * sigma + 0.5)`, so `sigma = 0.5`
/// gives a 5-tap kernel.
///
/// # Arguments
///
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// The odd size of the kernel.
pub fn gaussian_kernel_size(sigma: f32) -> usize {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as usize;
    2 * radius + 1
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create the 3-tap sobel kernels.
///
/// # Returns
///
/// A tuple with the derivative kernel and the smoothing kernel.
pub fn sobel_kernel_1d() -> ([f32; 3], [f32; 3]) {
    ([-1.0, 0.0, 1.0], [1.0, 2.0, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sobel_kernel_1d() {
        let (derivative, smoothing) = sobel_kernel_1d();
        assert_eq!(derivative, [-1.0, 0.0, 1.0]);
        assert_eq!(smoothing, [1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_gaussian_kernel_size() {
        assert_eq!(gaussian_kernel_size(0.5), 5);
        assert_eq!(gaussian_kernel_size(1.0), 9);
        assert_eq!(gaussian_kernel_size(0.1), 1);
    }

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(5, 0.5);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (&k, &e) in kernel.iter().zip(expected.iter()) {
            assert_relative_eq!(k, e, epsilon = 1e-7);
        }
        assert_relative_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }
}
