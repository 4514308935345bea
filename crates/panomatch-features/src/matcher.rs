use rayon::prelude::*;

use crate::{descriptor_set::DescriptorSet, error::FeatureError, keypoint::Match};

/// Below this best distance the ratio matcher reports a perfect score of `1`.
pub const EXACT_MATCH_DISTANCE: f32 = 1e-5;

/// Pairs every query descriptor with one train descriptor.
pub trait FeatureMatcher: Send + Sync {
    /// Match each row of `query` against all rows of `train`.
    ///
    /// Returns one match per query row, in query order. An empty side yields no matches.
    fn match_features(
        &self,
        query: &DescriptorSet,
        train: &DescriptorSet,
    ) -> Result<Vec<Match>, FeatureError>;
}

/// Squared euclidean distance between two descriptors.
#[inline]
fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y) * (x - y)).sum()
}

/// Brute-force search of the closest and second closest train descriptor.
///
/// Returns `(best_idx, best_dist, second_dist)`, with `second_dist` infinite when the train
/// set has a single row. Ties keep the lowest index.
fn nearest_two(query: &[f32], train: &DescriptorSet) -> (usize, f32, f32) {
    let mut best_idx = 0;
    let mut best_dist = f32::INFINITY;
    let mut second_dist = f32::INFINITY;

    for (j, row) in train.iter_rows().enumerate() {
        let dist = squared_distance(query, row);
        if dist < best_dist {
            second_dist = best_dist;
            best_dist = dist;
            best_idx = j;
        } else if dist < second_dist {
            second_dist = dist;
        }
    }

    (best_idx, best_dist, second_dist)
}

fn brute_force(
    query: &DescriptorSet,
    train: &DescriptorSet,
    score: impl Fn(f32, f32, usize) -> f32 + Send + Sync,
) -> Result<Vec<Match>, FeatureError> {
    if query.cols() != train.cols() {
        return Err(FeatureError::DescriptorWidthMismatch(
            query.cols(),
            train.cols(),
        ));
    }

    if query.is_empty() || train.is_empty() {
        return Ok(Vec::new());
    }

    let matches = (0..query.rows())
        .into_par_iter()
        .map(|i| {
            let row = &query.as_slice()[i * query.cols()..(i + 1) * query.cols()];
            let (j, best, second) = nearest_two(row, train);
            Match::new(i, j, score(best, second, train.rows()))
        })
        .collect();

    Ok(matches)
}

/// Nearest neighbor by sum of squared differences.
///
/// The match distance is the squared euclidean distance to the closest train row.
#[derive(Clone, Copy, Debug, Default)]
pub struct SsdMatcher;

impl FeatureMatcher for SsdMatcher {
    fn match_features(
        &self,
        query: &DescriptorSet,
        train: &DescriptorSet,
    ) -> Result<Vec<Match>, FeatureError> {
        brute_force(query, train, |best, _, _| best)
    }
}

/// Nearest neighbor scored by the ratio of the best to the second best distance.
///
/// The score is `1` when the best distance is below [`EXACT_MATCH_DISTANCE`], `0` when
/// the train set has a single row and `best / second` otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct RatioMatcher;

impl FeatureMatcher for RatioMatcher {
    fn match_features(
        &self,
        query: &DescriptorSet,
        train: &DescriptorSet,
    ) -> Result<Vec<Match>, FeatureError> {
        brute_force(query, train, |best, second, train_rows| {
            if best < EXACT_MATCH_DISTANCE {
                1.0
            } else if train_rows < 2 {
                0.0
            } else {
                best / second
            }
        })
    }
}
