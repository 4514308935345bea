/// A border type for the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// This border type fills the border with zeros.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    #[default]
    Reflect,
}

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else if i >= len {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect`: mirror including edge
    /// - `Constant`: `None` for indices outside `[0, len)`, the sample reads as zero
    ///
    /// # Arguments
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension, must be non-zero.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            PaddingMode::Constant => None,
            PaddingMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            PaddingMode::Reflect => Some(Self::reflect(i, len)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PaddingMode;

    #[test]
    fn test_map_index_reflect() {
        let mode = PaddingMode::Reflect;
        assert_eq!(mode.map_index(-1, 4), Some(0));
        assert_eq!(mode.map_index(-2, 4), Some(1));
        assert_eq!(mode.map_index(4, 4), Some(3));
        assert_eq!(mode.map_index(5, 4), Some(2));
        assert_eq!(mode.map_index(2, 4), Some(2));
        assert_eq!(mode.map_index(-3, 1), Some(0));
    }

    #[test]
    fn test_map_index_replicate() {
        let mode = PaddingMode::Replicate;
        assert_eq!(mode.map_index(-2, 4), Some(0));
        assert_eq!(mode.map_index(6, 4), Some(3));
    }

    #[test]
    fn test_map_index_constant() {
        let mode = PaddingMode::Constant;
        assert_eq!(mode.map_index(-1, 4), None);
        assert_eq!(mode.map_index(4, 4), None);
        assert_eq!(mode.map_index(3, 4), Some(3));
    }
}
