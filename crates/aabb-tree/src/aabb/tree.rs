//! AABB tree container and construction.

use std::cmp::Ordering;

use log::debug;
use nalgebra::Point;

use crate::{BoundingBox, Real, TreeConfig, simplex_barycenter};

use super::node::AabbNode;
use super::selector::{AxisSelector, LongestAxis};
use super::visitor::{CollectingVisitor, LeafVisitor};

/// An axis-aligned bounding box tree over the simplices of a mesh.
///
/// The tree stores primitive indices only. Vertices and elements stay owned
/// by the caller and are passed to every query, so one mesh snapshot can be
/// shared by several trees and queries without copying.
///
/// # Construction
///
/// Trees are built once from a vertex slice and an element slice, splitting
/// every node at the median primitive along an axis chosen by an
/// [`AxisSelector`]:
///
/// ```
/// use aabb_tree::AabbTree;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ];
/// let elements = vec![[0, 1, 2], [1, 3, 2]];
/// let tree = AabbTree::build(&vertices, &elements);
/// assert_eq!(tree.leaf_count(), 2);
/// ```
///
/// # Queries
///
/// Queries take `&self`, so a built tree can be shared between threads.
/// See the `nearest`, `find`, `ray_*` and `serialize` methods.
#[derive(Debug, Clone)]
pub struct AabbTree<T: Real, const D: usize> {
    root: Option<AabbNode<T, D>>,
    config: TreeConfig<T>,
}

impl<T: Real, const D: usize> AabbTree<T, D> {
    /// Creates an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Creates an empty tree with the given configuration.
    pub fn with_config(config: TreeConfig<T>) -> Self {
        Self { root: None, config }
    }

    /// Builds a tree over `elements` using the default configuration and the
    /// [`LongestAxis`] selector.
    ///
    /// Returns an empty tree if either slice is empty.
    pub fn build<const K: usize>(vertices: &[Point<T, D>], elements: &[[usize; K]]) -> Self {
        Self::build_with(vertices, elements, TreeConfig::default(), &LongestAxis)
    }

    /// Builds a tree using the given configuration and the [`LongestAxis`] selector.
    pub fn build_with_config<const K: usize>(
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        config: TreeConfig<T>,
    ) -> Self {
        Self::build_with(vertices, elements, config, &LongestAxis)
    }

    /// Builds a tree using the given configuration and split-axis selector.
    ///
    /// # Panics
    ///
    /// Panics if an element refers to a vertex outside `vertices`.
    pub fn build_with<S: AxisSelector, const K: usize>(
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        config: TreeConfig<T>,
        selector: &S,
    ) -> Self {
        let root = build_root(vertices, elements, selector);
        let tree = Self { root, config };
        debug!(
            "built AABB tree over {} primitives ({} nodes, height {})",
            elements.len(),
            tree.node_count(),
            tree.height()
        );
        tree
    }

    /// Builds a tree over a point cloud, one leaf per point.
    ///
    /// Queries on the result take [`point_elements`] of the same length as
    /// their element slice.
    pub fn build_points(points: &[Point<T, D>]) -> Self {
        Self::build(points, &point_elements(points.len()))
    }

    /// Discards the current tree and builds a new one over the given mesh,
    /// keeping the configuration.
    pub fn rebuild<const K: usize>(&mut self, vertices: &[Point<T, D>], elements: &[[usize; K]]) {
        self.rebuild_with(vertices, elements, &LongestAxis);
    }

    /// Like [`rebuild`](Self::rebuild) with a custom split-axis selector.
    pub fn rebuild_with<S: AxisSelector, const K: usize>(
        &mut self,
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        selector: &S,
    ) {
        *self = Self::build_with(vertices, elements, self.config, selector);
    }

    /// Wraps an already assembled root node.
    pub(crate) fn from_root(root: Option<AabbNode<T, D>>, config: TreeConfig<T>) -> Self {
        Self { root, config }
    }

    /// Returns `true` if the tree contains no primitives.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&AabbNode<T, D>> {
        self.root.as_ref()
    }

    /// Returns the configuration the tree was built with.
    #[inline]
    pub fn config(&self) -> &TreeConfig<T> {
        &self.config
    }

    /// Replaces the configuration used by subsequent queries.
    #[inline]
    pub fn set_config(&mut self, config: TreeConfig<T>) {
        self.config = config;
    }

    /// Returns the box around the whole mesh, or an empty box for an empty tree.
    pub fn bounding_box(&self) -> BoundingBox<T, D> {
        self.root.as_ref().map_or_else(BoundingBox::empty, |n| *n.bbox())
    }

    /// Returns the number of primitives in the tree.
    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.leaf_count())
    }

    /// Returns the number of nodes in the tree, leaves included.
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.node_count())
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.depth())
    }

    /// Returns the length of the level-order array the tree serializes to.
    pub fn subtree_size(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.subtree_size())
    }

    /// Checks the box invariants against the mesh the tree was built over.
    ///
    /// Every internal box must equal the union of its children's boxes and
    /// every leaf box must contain all vertices of its primitive.
    pub fn check_invariants<const K: usize>(
        &self,
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
    ) -> bool {
        self.root
            .as_ref()
            .is_none_or(|n| check_node(n, vertices, elements))
    }

    /// Calls `visitor` for every leaf whose box overlaps `query`, in tree order.
    pub fn visit_intersecting<V: LeafVisitor<T, D>>(&self, query: &BoundingBox<T, D>, visitor: &mut V) {
        if let Some(ref root) = self.root {
            visit_intersecting_node(root, query, visitor);
        }
    }

    /// Returns the primitives whose leaf boxes overlap `query`.
    pub fn intersecting_leaves(&self, query: &BoundingBox<T, D>) -> Vec<usize> {
        let mut visitor = CollectingVisitor::new();
        self.visit_intersecting(query, &mut visitor);
        visitor.into_primitives()
    }
}

impl<T: Real, const D: usize> Default for AabbTree<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the element slice of a point cloud: `[[0], [1], ..., [count - 1]]`.
pub fn point_elements(count: usize) -> Vec<[usize; 1]> {
    (0..count).map(|i| [i]).collect()
}

/// Ranks every primitive along every axis, then splits recursively.
fn build_root<T: Real, const D: usize, const K: usize, S: AxisSelector>(
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    selector: &S,
) -> Option<AabbNode<T, D>> {
    if vertices.is_empty() || elements.is_empty() {
        return None;
    }

    let centers: Vec<Point<T, D>> = elements
        .iter()
        .map(|element| {
            if K == 1 {
                vertices[element[0]]
            } else {
                simplex_barycenter(vertices, element)
            }
        })
        .collect();

    // Ranks are distinct per axis, so a median split never leaves a side empty
    let mut ranks = vec![[0usize; D]; elements.len()];
    let mut order: Vec<usize> = Vec::with_capacity(elements.len());
    for axis in 0..D {
        // Ties keep element order on every axis
        order.clear();
        order.extend(0..elements.len());
        order.sort_by(|&a, &b| compare_coordinates(centers[a][axis], centers[b][axis]));
        for (rank, &primitive) in order.iter().enumerate() {
            ranks[primitive][axis] = rank;
        }
    }

    let all: Vec<usize> = (0..elements.len()).collect();
    build_node(vertices, elements, &ranks, all, selector)
}

/// Orders coordinates with NaN after every number, so the sort stays total.
fn compare_coordinates<T: Real>(a: T, b: T) -> Ordering {
    let is_nan = |x: T| x.partial_cmp(&x).is_none();
    a.partial_cmp(&b)
        .unwrap_or_else(|| is_nan(a).cmp(&is_nan(b)))
}

/// Recursively builds a node over the primitives in `indices`.
fn build_node<T: Real, const D: usize, const K: usize, S: AxisSelector>(
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    ranks: &[[usize; D]],
    indices: Vec<usize>,
    selector: &S,
) -> Option<AabbNode<T, D>> {
    if indices.is_empty() {
        return None;
    }

    let bbox = BoundingBox::from_points(
        indices
            .iter()
            .flat_map(move |&i| elements[i].iter().map(move |&v| &vertices[v])),
    );

    if let [primitive] = indices[..] {
        return Some(AabbNode::leaf(bbox, primitive));
    }

    let axis = selector.select_axis(&bbox);
    let mut axis_ranks: Vec<usize> = indices.iter().map(|&i| ranks[i][axis]).collect();
    let middle = (axis_ranks.len() - 1) / 2;
    let (_, &mut median, _) = axis_ranks.select_nth_unstable(middle);

    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| ranks[i][axis] <= median);

    match (
        build_node(vertices, elements, ranks, left, selector),
        build_node(vertices, elements, ranks, right, selector),
    ) {
        (Some(left), Some(right)) => Some(AabbNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

fn check_node<T: Real, const D: usize, const K: usize>(
    node: &AabbNode<T, D>,
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
) -> bool {
    match node {
        AabbNode::Leaf { bbox, primitive } => elements
            .get(*primitive)
            .is_some_and(|element| element.iter().all(|&v| bbox.contains(&vertices[v]))),
        AabbNode::Internal { bbox, left, right } => {
            *bbox == left.bbox().union(right.bbox())
                && check_node(left, vertices, elements)
                && check_node(right, vertices, elements)
        }
    }
}

fn visit_intersecting_node<T: Real, const D: usize, V: LeafVisitor<T, D>>(
    node: &AabbNode<T, D>,
    query: &BoundingBox<T, D>,
    visitor: &mut V,
) {
    if !node.bbox().intersects(query) {
        return;
    }
    match node {
        AabbNode::Leaf { bbox, primitive } => visitor.visit(*primitive, bbox),
        AabbNode::Internal { left, right, .. } => {
            visit_intersecting_node(left, query, visitor);
            visit_intersecting_node(right, query, visitor);
        }
    }
}
