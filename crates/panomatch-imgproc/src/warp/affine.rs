use panomatch_image::{Image, ImageError};

use crate::interpolation::bilinear_interpolation;
use crate::padding::PaddingMode;
use crate::parallel;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // a singular matrix inverts to zeros
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns the 2x3 matrix of a translation by `(tx, ty)`.
pub fn translation_matrix2d(tx: f32, ty: f32) -> [f32; 6] {
    [1.0, 0.0, tx, 0.0, 1.0, ty]
}

/// Returns the 2x3 matrix of a rotation about the origin.
///
/// The matrix is
///
/// | cos(angle) -sin(angle) 0 |
/// | sin(angle)  cos(angle) 0 |
///
/// # Arguments
///
/// * `angle` - The angle of rotation in degrees.
pub fn rotation_matrix2d(angle: f32) -> [f32; 6] {
    let (sin, cos) = angle.to_radians().sin_cos();
    [cos, -sin, 0.0, sin, cos, 0.0]
}

/// Returns the 2x3 matrix of an axis-aligned scale about the origin.
pub fn scale_matrix2d(sx: f32, sy: f32) -> [f32; 6] {
    [sx, 0.0, 0.0, 0.0, sy, 0.0]
}

/// Compose two affine transforms.
///
/// The result applies `b` first and then `a`, i.e. it is the matrix product `a * b`
/// of the 3x3 homogeneous forms.
pub fn compose_affine(a: &[f32; 6], b: &[f32; 6]) -> [f32; 6] {
    [
        a[0] * b[0] + a[1] * b[3],
        a[0] * b[1] + a[1] * b[4],
        a[0] * b[2] + a[1] * b[5] + a[2],
        a[3] * b[0] + a[4] * b[3],
        a[3] * b[1] + a[4] * b[4],
        a[3] * b[2] + a[4] * b[5] + a[5],
    ]
}

/// Applies an affine transformation to a point.
pub fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// `m` maps source coordinates to destination coordinates. Each destination pixel
/// is filled by mapping it back through the inverse of `m` and sampling the source
/// with bilinear interpolation. Source samples outside the image are read with
/// `border`.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The 2x3 affine transformation matrix.
/// * `border` - How source samples outside the image are read.
///
/// # Example
///
/// ```
/// use panomatch_image::{Image, ImageSize};
/// use panomatch_imgproc::padding::PaddingMode;
/// use panomatch_imgproc::warp::warp_affine;
///
/// let src = Image::<_, 1>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1f32,
/// ).unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
/// let mut dst = Image::<_, 1>::from_size_val([2, 3].into(), 0.0).unwrap();
///
/// warp_affine(&src, &mut dst, &m, PaddingMode::Constant).unwrap();
///
/// assert_eq!(dst.as_slice(), &[1.0; 6]);
/// ```
pub fn warp_affine<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    m: &[f32; 6],
    border: PaddingMode,
) -> Result<(), ImageError> {
    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    parallel::par_iter_rows_coords(dst, |x, y, dst_pixel| {
        let (u_src, v_src) = transform_point(x as f32, y as f32, &m_inv);
        let pixel = bilinear_interpolation(src, u_src, v_src, border);
        dst_pixel.copy_from_slice(&pixel);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use panomatch_image::ImageSize;

    #[test]
    fn test_invert_affine_transform() {
        let m = [2.0, 0.0, 3.0, 0.0, 4.0, -8.0];
        let m_inv = invert_affine_transform(&m);
        assert_eq!(m_inv, [0.5, 0.0, -1.5, 0.0, 0.25, 2.0]);

        let identity = compose_affine(&m, &m_inv);
        assert_eq!(identity, [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_invert_singular() {
        let m = [1.0, 2.0, 0.0, 2.0, 4.0, 0.0];
        assert_eq!(invert_affine_transform(&m), [0.0; 6]);
    }

    #[test]
    fn test_compose_order() {
        // translate then scale
        let m = compose_affine(&scale_matrix2d(2.0, 2.0), &translation_matrix2d(1.0, 0.0));
        assert_eq!(transform_point(0.0, 0.0, &m), (2.0, 0.0));

        // scale then translate
        let m = compose_affine(&translation_matrix2d(1.0, 0.0), &scale_matrix2d(2.0, 2.0));
        assert_eq!(transform_point(0.0, 0.0, &m), (1.0, 0.0));
    }

    #[test]
    fn test_rotation_matrix2d() {
        let m = rotation_matrix2d(90.0);
        let (u, v) = transform_point(1.0, 0.0, &m);
        assert_relative_eq!(u, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn warp_affine_correctness_identity() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            (0..20).map(|x| x as f32).collect(),
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            PaddingMode::Constant,
        )?;

        assert_eq!(image_transformed.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn warp_affine_translation_fills_zero() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![
                1.0, 2.0, 3.0,
                4.0, 5.0, 6.0,
            ],
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), -1.0)?;

        // shift the content one pixel to the right
        warp_affine(
            &image,
            &mut image_transformed,
            &translation_matrix2d(1.0, 0.0),
            PaddingMode::Constant,
        )?;

        #[rustfmt::skip]
        assert_eq!(
            image_transformed.as_slice(),
            &[
                0.0, 1.0, 2.0,
                0.0, 4.0, 5.0,
            ]
        );

        Ok(())
    }

    #[test]
    fn warp_affine_scale_down() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![0.0, 1.0, 2.0, 3.0],
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val([2, 1].into(), 0.0)?;

        warp_affine(
            &image,
            &mut image_transformed,
            &scale_matrix2d(0.5, 1.0),
            PaddingMode::Constant,
        )?;

        assert_eq!(image_transformed.as_slice(), &[0.0, 2.0]);

        Ok(())
    }
}
