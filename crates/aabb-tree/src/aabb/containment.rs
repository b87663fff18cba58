//! Point-in-simplex queries for triangle meshes in 2D and tetrahedral meshes in 3D.

use nalgebra::{Point, Point2, Point3};

use crate::{Real, tetrahedron_volume, triangle_double_area};

use super::node::AabbNode;
use super::tree::AabbTree;

impl<T: Real, const D: usize> AabbTree<T, D> {
    /// Returns the simplices containing `query`, in tree order.
    ///
    /// Elements must be full-dimensional: triangles in 2D, tetrahedra in 3D.
    /// A point on a shared face is reported by every simplex touching it,
    /// within the tree's `containment_epsilon`. With `first = true` the
    /// search stops at the first hit, returning at most one index.
    ///
    /// # Panics
    ///
    /// Panics if `D` is not 2 or 3, or if `K != D + 1`.
    pub fn find<const K: usize>(
        &self,
        vertices: &[Point<T, D>],
        elements: &[[usize; K]],
        query: &Point<T, D>,
        first: bool,
    ) -> Vec<usize> {
        assert!(D == 2 || D == 3, "Containment queries need a 2D or 3D tree");
        assert!(
            K == D + 1,
            "Containment queries need triangles in 2D or tetrahedra in 3D"
        );

        let mut found = Vec::new();
        if let Some(root) = self.root() {
            let epsilon = self.config().containment_epsilon;
            find_node(root, vertices, elements, query, first, epsilon, &mut found);
        }
        found
    }
}

/// Returns `true` once the search may stop.
fn find_node<T: Real, const D: usize, const K: usize>(
    node: &AabbNode<T, D>,
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    query: &Point<T, D>,
    first: bool,
    epsilon: T,
    found: &mut Vec<usize>,
) -> bool {
    if !node.bbox().contains(query) {
        return false;
    }

    match node {
        AabbNode::Leaf { primitive, .. } => {
            if simplex_contains(vertices, &elements[*primitive], query, epsilon) {
                found.push(*primitive);
                return first;
            }
            false
        }
        AabbNode::Internal { left, right, .. } => {
            find_node(left, vertices, elements, query, first, epsilon, found)
                || find_node(right, vertices, elements, query, first, epsilon, found)
        }
    }
}

/// Signed sub-measure test, normalized by the total so winding does not matter.
///
/// A zero-measure simplex normalizes to NaN and contains nothing.
fn simplex_contains<T: Real, const D: usize, const K: usize>(
    vertices: &[Point<T, D>],
    element: &[usize; K],
    query: &Point<T, D>,
    epsilon: T,
) -> bool {
    let weights = if D == 2 {
        let v = |i: usize| Point2::new(vertices[element[i]][0], vertices[element[i]][1]);
        let q = Point2::new(query[0], query[1]);
        let (v1, v2, v3) = (v(0), v(1), v(2));
        [
            triangle_double_area(&v1, &v2, &q),
            triangle_double_area(&v2, &v3, &q),
            triangle_double_area(&v3, &v1, &q),
            T::zero(),
        ]
    } else {
        let v = |i: usize| {
            let p = &vertices[element[i]];
            Point3::new(p[0], p[1], p[2])
        };
        let q = Point3::new(query[0], query[1], query[2]);
        let (v1, v2, v3, v4) = (v(0), v(1), v(2), v(3));
        [
            tetrahedron_volume(&v2, &v4, &v3, &q),
            tetrahedron_volume(&v1, &v3, &v4, &q),
            tetrahedron_volume(&v1, &v4, &v2, &q),
            tetrahedron_volume(&v1, &v2, &v3, &q),
        ]
    };

    let sum = weights.iter().fold(T::zero(), |acc, &w| acc + w);
    weights.iter().all(|&w| w / sum >= -epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeConfig;
    use nalgebra::{Point2, Point3};

    fn make_square() -> (Vec<Point2<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        // Opposite windings on purpose
        let elements = vec![[0, 1, 2], [0, 3, 2]];
        (vertices, elements)
    }

    fn make_cube() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        let mut vertices = Vec::new();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    vertices.push(Point3::new(x as f64, y as f64, z as f64));
                }
            }
        }
        // Six tetrahedra around the main diagonal 0 -> 7
        let elements = vec![
            [0, 1, 3, 7],
            [0, 3, 2, 7],
            [0, 2, 6, 7],
            [0, 6, 4, 7],
            [0, 4, 5, 7],
            [0, 5, 1, 7],
        ];
        (vertices, elements)
    }

    #[test]
    fn finds_triangle_in_2d() {
        let (vertices, elements) = make_square();
        let tree = AabbTree::build(&vertices, &elements);

        assert_eq!(tree.find(&vertices, &elements, &Point2::new(0.8, 0.2), false), vec![0]);
        assert_eq!(tree.find(&vertices, &elements, &Point2::new(0.2, 0.8), false), vec![1]);
        assert!(tree.find(&vertices, &elements, &Point2::new(1.5, 0.5), false).is_empty());
    }

    #[test]
    fn shared_edge_reports_both_unless_first() {
        let (vertices, elements) = make_square();
        let tree = AabbTree::build(&vertices, &elements);
        let diagonal = Point2::new(0.5, 0.5);

        let mut all = tree.find(&vertices, &elements, &diagonal, false);
        all.sort_unstable();
        assert_eq!(all, vec![0, 1]);

        assert_eq!(tree.find(&vertices, &elements, &diagonal, true).len(), 1);
    }

    #[test]
    fn finds_tetrahedron_in_3d() {
        let (vertices, elements) = make_cube();
        let tree = AabbTree::build(&vertices, &elements);

        // Interior convex combination of tetrahedron 2
        let [a, b, c, d] = elements[2].map(|i| vertices[i].coords);
        let inside = Point3::from(a * 0.1 + b * 0.2 + c * 0.3 + d * 0.4);
        assert_eq!(tree.find(&vertices, &elements, &inside, false), vec![2]);

        assert!(tree.find(&vertices, &elements, &Point3::new(2.0, 0.5, 0.5), false).is_empty());
    }

    #[test]
    fn cube_center_lies_in_every_tetrahedron() {
        let (vertices, elements) = make_cube();
        let tree = AabbTree::build(&vertices, &elements);

        let center = Point3::new(0.5, 0.5, 0.5);
        let mut all = tree.find(&vertices, &elements, &center, false);
        all.sort_unstable();
        assert_eq!(all, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn epsilon_widens_containment() {
        let (vertices, elements) = make_square();
        // Just above the shared diagonal, inside triangle 1 only
        let near_edge = Point2::new(0.5, 0.5 + 1e-9);

        let strict = AabbTree::build(&vertices, &elements);
        assert_eq!(strict.find(&vertices, &elements, &near_edge, false), vec![1]);

        let loose = AabbTree::build_with_config(
            &vertices,
            &elements,
            TreeConfig::default().with_containment_epsilon(1e-6),
        );
        let mut all = loose.find(&vertices, &elements, &near_edge, false);
        all.sort_unstable();
        assert_eq!(all, vec![0, 1]);
    }

    #[test]
    fn degenerate_triangle_contains_nothing() {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        let elements = vec![[0, 1, 2]];
        let tree = AabbTree::build(&vertices, &elements);
        assert!(tree.find(&vertices, &elements, &Point2::new(1.0, 1.0), false).is_empty());
    }

    #[test]
    #[should_panic(expected = "Containment queries need")]
    fn wrong_arity_panics() {
        let (vertices, _) = make_square();
        let segments = vec![[0, 1]];
        let tree = AabbTree::build(&vertices, &segments);
        tree.find(&vertices, &segments, &Point2::new(0.5, 0.0), false);
    }
}
