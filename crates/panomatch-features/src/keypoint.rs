use serde::{Deserialize, Serialize};

/// Size assigned to every keypoint. Scale selection is not performed.
pub const KEYPOINT_SIZE: f32 = 10.0;

/// A detected interest point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// The x-coordinate (column) of the keypoint.
    pub x: f32,
    /// The y-coordinate (row) of the keypoint.
    pub y: f32,
    /// The dominant orientation in degrees.
    pub angle: f32,
    /// The detector response at the keypoint.
    pub response: f32,
    /// The diameter of the keypoint neighborhood.
    pub size: f32,
}

impl Keypoint {
    /// Creates a keypoint with the fixed [`KEYPOINT_SIZE`].
    pub fn new(x: f32, y: f32, angle: f32, response: f32) -> Self {
        Keypoint {
            x,
            y,
            angle,
            response,
            size: KEYPOINT_SIZE,
        }
    }

    /// The position of the keypoint as `(x, y)`.
    pub fn pt(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// A candidate correspondence between two descriptor sets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Row index into the first (query) descriptor set.
    pub query_idx: usize,
    /// Row index into the second (train) descriptor set.
    pub train_idx: usize,
    /// The matcher score; its meaning depends on the matcher.
    pub distance: f32,
}

impl Match {
    /// Creates a new match.
    pub fn new(query_idx: usize, train_idx: usize, distance: f32) -> Self {
        Match {
            query_idx,
            train_idx,
            distance,
        }
    }
}
