//! Level-order array encoding of a tree.
//!
//! Slot `0` holds the root and the children of slot `i` live at `2i + 1` and
//! `2i + 2`. Internal nodes carry the id [`INTERNAL_ID`]; leaves carry their
//! primitive index. Slots not used by an unbalanced tree hold an empty box
//! and [`INTERNAL_ID`] as well.

use std::cmp::Ordering;

use log::{debug, warn};
use nalgebra::Point;

use crate::{BoundingBox, Real, TreeConfig, TreeError};

use super::node::AabbNode;
use super::tree::AabbTree;

/// Id of internal nodes and unused slots in a [`SerializedTree`].
pub const INTERNAL_ID: isize = -1;

/// A tree flattened into three parallel level-order arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedTree<T: Real, const D: usize> {
    /// Min corner of each slot's box.
    pub mins: Vec<Point<T, D>>,
    /// Max corner of each slot's box.
    pub maxs: Vec<Point<T, D>>,
    /// Primitive index of each leaf slot, [`INTERNAL_ID`] elsewhere.
    pub ids: Vec<isize>,
}

impl<T: Real, const D: usize> SerializedTree<T, D> {
    /// Returns the number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the arrays hold no slots (an empty tree).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<T: Real, const D: usize> AabbTree<T, D> {
    /// Flattens the tree into level-order arrays of length
    /// [`subtree_size`](Self::subtree_size).
    pub fn serialize(&self) -> SerializedTree<T, D> {
        let size = self.subtree_size();
        let empty = BoundingBox::<T, D>::empty();
        let mut serialized = SerializedTree {
            mins: vec![*empty.min(); size],
            maxs: vec![*empty.max(); size],
            ids: vec![INTERNAL_ID; size],
        };
        if let Some(root) = self.root() {
            serialize_node(root, 0, &mut serialized);
        }
        serialized
    }

    /// Rebuilds a tree from level-order arrays without re-sorting.
    ///
    /// `elements` is only used to validate the leaf ids. The tree gets the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Fails if the arrays differ in length, if an internal node's child slot
    /// is missing, if a reached slot has a negative id other than
    /// [`INTERNAL_ID`] or an inverted or NaN box, or if a leaf id is not an index
    /// into `elements`.
    pub fn deserialize<const K: usize>(
        elements: &[[usize; K]],
        serialized: &SerializedTree<T, D>,
    ) -> Result<Self, TreeError> {
        let SerializedTree { mins, maxs, ids } = serialized;
        if mins.len() != ids.len() || maxs.len() != ids.len() {
            let error = TreeError::LengthMismatch {
                mins: mins.len(),
                maxs: maxs.len(),
                ids: ids.len(),
            };
            warn!("rejecting serialized tree: {error}");
            return Err(error);
        }

        let root = if serialized.is_empty() {
            None
        } else {
            match deserialize_node(serialized, elements.len(), 0) {
                Ok(root) => Some(root),
                Err(error) => {
                    warn!("rejecting serialized tree: {error}");
                    return Err(error);
                }
            }
        };

        let tree = Self::from_root(root, TreeConfig::default());
        debug!(
            "deserialized AABB tree from {} slots ({} primitives, height {})",
            serialized.len(),
            tree.leaf_count(),
            tree.height()
        );
        Ok(tree)
    }
}

fn serialize_node<T: Real, const D: usize>(
    node: &AabbNode<T, D>,
    slot: usize,
    serialized: &mut SerializedTree<T, D>,
) {
    serialized.mins[slot] = *node.bbox().min();
    serialized.maxs[slot] = *node.bbox().max();
    match node {
        AabbNode::Leaf { primitive, .. } => {
            serialized.ids[slot] = *primitive as isize;
        }
        AabbNode::Internal { left, right, .. } => {
            serialize_node(left, 2 * slot + 1, serialized);
            serialize_node(right, 2 * slot + 2, serialized);
        }
    }
}

fn deserialize_node<T: Real, const D: usize>(
    serialized: &SerializedTree<T, D>,
    element_count: usize,
    slot: usize,
) -> Result<AabbNode<T, D>, TreeError> {
    let (min, max) = (serialized.mins[slot], serialized.maxs[slot]);
    // Unordered corners (NaN) are as invalid as inverted ones
    let ordered = |i: usize| {
        matches!(
            min[i].partial_cmp(&max[i]),
            Some(Ordering::Less | Ordering::Equal)
        )
    };
    if !(0..D).all(ordered) {
        return Err(TreeError::InvalidBox { slot });
    }
    let bbox = BoundingBox::new(min, max);

    match serialized.ids[slot] {
        INTERNAL_ID => {
            let len = serialized.len();
            let child = |slot_index: usize| {
                if slot_index >= len {
                    return Err(TreeError::MissingSlot {
                        parent: slot,
                        slot: slot_index,
                        len,
                    });
                }
                deserialize_node(serialized, element_count, slot_index)
            };
            let left = child(2 * slot + 1)?;
            let right = child(2 * slot + 2)?;
            Ok(AabbNode::Internal {
                bbox,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
        id if id < 0 => Err(TreeError::InvalidId { slot, id }),
        id => {
            let primitive = id as usize;
            if primitive >= element_count {
                return Err(TreeError::PrimitiveOutOfRange {
                    slot,
                    primitive,
                    count: element_count,
                });
            }
            Ok(AabbNode::leaf(bbox, primitive))
        }
    }
}
