//! Split-axis selection strategies for tree construction.
//!
//! The builder splits every node at the median of its primitives along one
//! axis. Which axis is chosen affects the shape of the boxes and therefore
//! how well queries prune.

use crate::{BoundingBox, Real};

/// Strategy for choosing the axis along which a node's primitives are split.
pub trait AxisSelector {
    /// Select the split axis for a node with the given box.
    ///
    /// The returned index must be smaller than `D`.
    fn select_axis<T: Real, const D: usize>(&self, bbox: &BoundingBox<T, D>) -> usize;
}

/// Splits along the axis with the largest box extent.
///
/// Ties go to the lowest axis index. This keeps boxes close to cubic, which
/// makes the exterior-distance bound of nearest queries tight.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestAxis;

impl AxisSelector for LongestAxis {
    fn select_axis<T: Real, const D: usize>(&self, bbox: &BoundingBox<T, D>) -> usize {
        bbox.longest_axis()
    }
}
