use crate::error::FeatureError;

/// A dense row-major table of descriptors, one row per keypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorSet {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl DescriptorSet {
    /// Create a descriptor set from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::InvalidDescriptorShape`] when `data.len() != rows * cols`
    /// or when non-empty rows have zero width.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, FeatureError> {
        if data.len() != rows * cols || (cols == 0 && rows > 0) {
            return Err(FeatureError::InvalidDescriptorShape(data.len(), rows, cols));
        }
        Ok(Self { data, rows, cols })
    }

    /// An empty set with the given descriptor width.
    pub fn empty(cols: usize) -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols,
        }
    }

    /// Build a set by concatenating rows that must all be `cols` wide.
    pub fn from_rows(cols: usize, rows: Vec<Vec<f32>>) -> Result<Self, FeatureError> {
        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * cols);
        for row in rows {
            if row.len() != cols {
                return Err(FeatureError::DescriptorWidthMismatch(row.len(), cols));
            }
            data.extend(row);
        }
        Self::new(num_rows, cols, data)
    }

    /// Number of descriptors.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of every descriptor.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the set holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The descriptor at row `i`, or `None` if out of bounds.
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.rows {
            return None;
        }
        Some(&self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Iterate over the descriptors in row order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |i| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// The flat row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
