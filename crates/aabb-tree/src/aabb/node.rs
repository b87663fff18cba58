//! AABB tree node implementation.

use crate::{BoundingBox, Real};

/// A node in the AABB tree.
///
/// A node is either a leaf holding exactly one primitive, or an internal node
/// owning exactly two children. Every node stores the box of its subtree:
/// a leaf's box contains all vertices of its primitive, and an internal
/// node's box is the union of its children's boxes.
#[derive(Debug, Clone, PartialEq)]
pub enum AabbNode<T: Real, const D: usize> {
    /// A single primitive.
    Leaf {
        /// Box around the primitive's vertices.
        bbox: BoundingBox<T, D>,
        /// Index of the primitive in the element slice.
        primitive: usize,
    },
    /// Two subtrees.
    Internal {
        /// Union of the children's boxes.
        bbox: BoundingBox<T, D>,
        left: Box<AabbNode<T, D>>,
        right: Box<AabbNode<T, D>>,
    },
}

impl<T: Real, const D: usize> AabbNode<T, D> {
    /// Creates a leaf node.
    #[inline]
    pub fn leaf(bbox: BoundingBox<T, D>, primitive: usize) -> Self {
        Self::Leaf { bbox, primitive }
    }

    /// Creates an internal node whose box is the union of both children.
    pub fn internal(left: Self, right: Self) -> Self {
        Self::Internal {
            bbox: left.bbox().union(right.bbox()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns the box of this subtree.
    #[inline]
    pub fn bbox(&self) -> &BoundingBox<T, D> {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }

    /// Checks if this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Returns the primitive index of a leaf, `None` for internal nodes.
    #[inline]
    pub fn primitive(&self) -> Option<usize> {
        match self {
            Self::Leaf { primitive, .. } => Some(*primitive),
            Self::Internal { .. } => None,
        }
    }

    /// Returns the left child of an internal node.
    #[inline]
    pub fn left(&self) -> Option<&Self> {
        match self {
            Self::Internal { left, .. } => Some(left),
            Self::Leaf { .. } => None,
        }
    }

    /// Returns the right child of an internal node.
    #[inline]
    pub fn right(&self) -> Option<&Self> {
        match self {
            Self::Internal { right, .. } => Some(right),
            Self::Leaf { .. } => None,
        }
    }

    /// Returns the number of leaves (primitives) in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Returns the number of nodes in this subtree, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Returns the number of slots this subtree needs in a level-order array.
    ///
    /// `1` for a leaf, `1 + 2 * max(left, right)` otherwise, so the children
    /// of slot `i` can always live at `2i + 1` and `2i + 2`.
    pub fn subtree_size(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => {
                1 + 2 * left.subtree_size().max(right.subtree_size())
            }
        }
    }
}
