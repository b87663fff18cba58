//! Axis-aligned bounding box tree over mesh simplices.
//!
//! This module provides a BVH built over the points, segments, triangles or
//! tetrahedra of a mesh given as a vertex slice plus an element slice. The
//! tree enables:
//!
//! - Closest-point queries, single, batched and tree-vs-tree
//! - Point containment in triangle (2D) and tetrahedral (3D) meshes
//! - First-hit and all-hits ray casting against 3D triangle meshes
//! - Level-order serialization
//!
//! # Example
//!
//! ```
//! use aabb_tree::AabbTree;
//! use nalgebra::{Point3, Vector3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let elements = vec![[0, 1, 2]];
//! let tree = AabbTree::build(&vertices, &elements);
//!
//! let nearest = tree
//!     .nearest(&vertices, &elements, &Point3::new(0.25, 0.25, 5.0))
//!     .unwrap();
//! assert_eq!(nearest.squared_distance, 25.0);
//!
//! let hit = tree
//!     .ray_first_hit(
//!         &vertices,
//!         &elements,
//!         &Point3::new(0.25, 0.25, -1.0),
//!         &Vector3::new(0.0, 0.0, 1.0),
//!     )
//!     .unwrap();
//! assert_eq!(hit.t, 1.0);
//! ```
//!
//! # Architecture
//!
//! - [`AabbTree`]: The main container holding the root node and configuration
//! - [`AabbNode`]: Leaf or internal node with its box
//! - [`AxisSelector`]: Strategy trait for choosing split axes
//! - [`LeafVisitor`]: Visitor trait for box-overlap traversal

mod containment;
mod nearest;
mod node;
mod raycast;
mod selector;
mod serial;
mod tree;
mod visitor;

// Re-export main types
pub use nearest::Nearest;
pub use node::AabbNode;
pub use selector::{AxisSelector, LongestAxis};
pub use serial::{INTERNAL_ID, SerializedTree};
pub use tree::{AabbTree, point_elements};
pub use visitor::{CollectingVisitor, FnVisitor, LeafVisitor};
