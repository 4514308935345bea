use crate::{
    error::FeatureError,
    keypoint::{Keypoint, Match},
};

/// Map a point through a 3x3 homography in row-major order.
///
/// Returns non-finite coordinates when the point maps to infinity.
pub fn apply_homography(pt: (f32, f32), h: &[f32; 9]) -> (f32, f32) {
    let (x, y) = pt;
    let w = h[6] * x + h[7] * y + h[8];
    let u = (h[0] * x + h[1] * y + h[2]) / w;
    let v = (h[3] * x + h[4] * y + h[5]) / w;
    (u, v)
}

/// Mean euclidean distance between the mapped query keypoints and their matched train
/// keypoints.
///
/// Every match maps `keypoints1[query_idx]` through `h` and measures the distance to
/// `keypoints2[train_idx]`. An empty match list scores `0`.
///
/// # Errors
///
/// * [`FeatureError::NonFiniteHomography`] if `h` holds NaN or infinite values.
/// * [`FeatureError::MatchIndexOutOfBounds`] if a match references a missing keypoint.
pub fn evaluate_matches(
    keypoints1: &[Keypoint],
    keypoints2: &[Keypoint],
    matches: &[Match],
    h: &[f32; 9],
) -> Result<f32, FeatureError> {
    if h.iter().any(|v| !v.is_finite()) {
        return Err(FeatureError::NonFiniteHomography);
    }

    if matches.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0f64;
    for m in matches {
        let (Some(kp1), Some(kp2)) = (keypoints1.get(m.query_idx), keypoints2.get(m.train_idx))
        else {
            return Err(FeatureError::MatchIndexOutOfBounds(
                m.query_idx,
                m.train_idx,
                keypoints1.len(),
                keypoints2.len(),
            ));
        };

        let (u, v) = apply_homography(kp1.pt(), h);
        let (dx, dy) = (u - kp2.x, v - kp2.y);
        total += ((dx * dx + dy * dy) as f64).sqrt();
    }

    Ok((total / matches.len() as f64) as f32)
}
