//! Closest-point queries.
//!
//! All variants share one branch-and-bound descent: children whose box
//! contains the query point are always visited, the others only when their
//! exterior distance beats the best distance found so far, nearer child
//! first.

use log::trace;
use nalgebra::Point;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Real, point_simplex_squared_distance};

use super::node::AabbNode;
use super::tree::AabbTree;

/// Result of a closest-point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<T: Real, const D: usize> {
    /// Squared distance from the query point to `point`.
    pub squared_distance: T,
    /// Index of the closest primitive in the element slice.
    pub primitive: usize,
    /// Closest point on that primitive.
    pub point: Point<T, D>,
}

/// Running best of one descent. `squared_distance` doubles as the upper bound.
struct Candidate<T: Real, const D: usize> {
    squared_distance: T,
    found: Option<(usize, Point<T, D>)>,
}

impl<T: Real, const D: usize> Candidate<T, D> {
    fn bounded_by(up: T) -> Self {
        Self {
            squared_distance: up,
            found: None,
        }
    }

    fn into_nearest(self) -> Option<Nearest<T, D>> {
        let squared_distance = self.squared_distance;
        self.found.map(|(primitive, point)| Nearest {
            squared_distance,
            primitive,
            point,
        })
    }
}

impl<T: Real, const D: usize> AabbTree<T, D> {
    /// Finds the primitive closest to `point`.
    ///
    /// Elements may be points, segments or triangles (`K` in `1..=3`).
    /// Returns `None` for an empty tree.
    ///
    /// # Panics
    ///
    /// Panics if `K` is not 1, 2 or 3.
    pub fn nearest<const K: usize>(
        &self,
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        point: &Point<T, D>,
    ) -> Option<Nearest<T, D>> {
        self.nearest_within(vertices, elements, point, T::zero(), T::INFINITY)
    }

    /// Finds the closest primitive among those with squared distance below `up`.
    ///
    /// `low` is a known lower bound on the answer: leaves are skipped once
    /// the running best drops below it. Returns `None` if `low > up` or if
    /// nothing lies closer than `up`.
    ///
    /// # Panics
    ///
    /// Panics if `K` is not 1, 2 or 3.
    pub fn nearest_within<const K: usize>(
        &self,
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        point: &Point<T, D>,
        low: T,
        up: T,
    ) -> Option<Nearest<T, D>> {
        if low > up {
            return None;
        }
        let root = self.root()?;
        let mut best = Candidate::bounded_by(up);
        nearest_node(root, vertices, elements, point, low, &mut best);
        best.into_nearest()
    }

    /// Runs [`nearest`](Self::nearest) for every point of `points`.
    ///
    /// Batches of at least `parallel_threshold` points are spread over the
    /// rayon thread pool when the `parallel` feature is enabled.
    pub fn nearest_many<const K: usize>(
        &self,
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        points: &[Point<T, D>],
    ) -> Vec<Option<Nearest<T, D>>> {
        #[cfg(feature = "parallel")]
        if points.len() >= self.config().parallel_threshold {
            trace!("nearest_many: {} points in parallel", points.len());
            return points
                .par_iter()
                .map(|p| self.nearest(vertices, elements, p))
                .collect();
        }

        trace!("nearest_many: {} points sequentially", points.len());
        points
            .iter()
            .map(|p| self.nearest(vertices, elements, p))
            .collect()
    }

    /// Finds the closest primitive of this tree for every point of a second
    /// tree built over `other_points` (see [`AabbTree::build_points`]).
    ///
    /// The result is indexed like `other_points` and every point gets the same
    /// answer as [`nearest`](Self::nearest) would give it. Only the other tree
    /// is descended: each of its leaves runs one single-point query against
    /// this tree, in the other tree's leaf order. There is no joint pruning
    /// between the two trees.
    pub fn nearest_to_tree<const K: usize>(
        &self,
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        other: &AabbTree<T, D>,
        other_points: &[Point<T, D>],
    ) -> Vec<Option<Nearest<T, D>>> {
        let mut best: Vec<Candidate<T, D>> = other_points
            .iter()
            .map(|_| Candidate::bounded_by(T::INFINITY))
            .collect();

        if let (Some(root), Some(other_root)) = (self.root(), other.root()) {
            nearest_to_tree_node(root, other_root, vertices, elements, other_points, &mut best);
        }

        best.into_iter().map(Candidate::into_nearest).collect()
    }
}

fn nearest_node<T: Real, const D: usize, const K: usize>(
    node: &AabbNode<T, D>,
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    point: &Point<T, D>,
    low: T,
    best: &mut Candidate<T, D>,
) {
    let (left, right) = match node {
        AabbNode::Leaf { primitive, .. } => {
            nearest_leaf(*primitive, vertices, elements, point, low, best);
            return;
        }
        AabbNode::Internal { left, right, .. } => (left, right),
    };

    let mut looked_left = false;
    let mut looked_right = false;
    if left.bbox().contains(point) {
        nearest_node(left, vertices, elements, point, low, best);
        looked_left = true;
    }
    if right.bbox().contains(point) {
        nearest_node(right, vertices, elements, point, low, best);
        looked_right = true;
    }

    let left_distance = left.bbox().squared_exterior_distance(point);
    let right_distance = right.bbox().squared_exterior_distance(point);
    let order = if left_distance < right_distance {
        [(left, left_distance, looked_left), (right, right_distance, looked_right)]
    } else {
        [(right, right_distance, looked_right), (left, left_distance, looked_left)]
    };
    for (child, distance, looked) in order {
        if !looked && distance < best.squared_distance {
            nearest_node(child, vertices, elements, point, low, best);
        }
    }
}

fn nearest_leaf<T: Real, const D: usize, const K: usize>(
    primitive: usize,
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    point: &Point<T, D>,
    low: T,
    best: &mut Candidate<T, D>,
) {
    if low > best.squared_distance {
        return;
    }
    let (squared_distance, closest) =
        point_simplex_squared_distance(point, vertices, elements, primitive);
    if squared_distance < best.squared_distance {
        best.squared_distance = squared_distance;
        best.found = Some((primitive, closest));
    }
}

/// Descends the other tree down to its leaves, resolving each of its points
/// against this subtree with that point's current best as the bound.
fn nearest_to_tree_node<T: Real, const D: usize, const K: usize>(
    node: &AabbNode<T, D>,
    other: &AabbNode<T, D>,
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    other_points: &[Point<T, D>],
    best: &mut [Candidate<T, D>],
) {
    match (node, other) {
        (AabbNode::Leaf { primitive, .. }, AabbNode::Leaf { primitive: q, .. }) => {
            nearest_leaf(*primitive, vertices, elements, &other_points[*q], T::zero(), &mut best[*q]);
        }
        (_, AabbNode::Leaf { primitive: q, .. }) => {
            nearest_node(node, vertices, elements, &other_points[*q], T::zero(), &mut best[*q]);
        }
        (_, AabbNode::Internal { left, right, .. }) => {
            nearest_to_tree_node(node, left, vertices, elements, other_points, best);
            nearest_to_tree_node(node, right, vertices, elements, other_points, best);
        }
    }
}
