//! Splitting-triangle selection strategies for BSP tree construction.
//!
//! The choice of splitting triangle affects tree balance and the number of
//! subdivisions during construction.

use crate::TriangleRef;

/// Strategy for selecting which triangle splits a subtree.
pub trait SplitterSelector {
    /// Returns the index (into `triangles`) of the splitting triangle, or
    /// `None` if the slice is empty.
    fn select(&self, triangles: &[TriangleRef]) -> Option<usize>;
}

/// Selects the first triangle in the list.
///
/// Deterministic for a given input order, which makes rebuilt trees
/// structurally identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTriangle;

impl SplitterSelector for FirstTriangle {
    fn select(&self, triangles: &[TriangleRef]) -> Option<usize> {
        if triangles.is_empty() { None } else { Some(0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_triangle_empty_list() {
        assert!(FirstTriangle.select(&[]).is_none());
    }

    #[test]
    fn first_triangle_multiple() {
        let refs = [TriangleRef::new(3, 1), TriangleRef::new(0, 0)];
        assert_eq!(FirstTriangle.select(&refs), Some(0));
    }
}
