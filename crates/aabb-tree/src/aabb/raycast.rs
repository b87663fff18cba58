//! Ray queries against triangle meshes in 3D.

use log::trace;
use nalgebra::{Point3, Vector3};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Hit, Ray, Real, TriangleIntersection, ray_triangle_intersect};

use super::node::AabbNode;
use super::tree::AabbTree;

impl<T: Real> AabbTree<T, 3> {
    /// Returns every triangle hit by the ray `origin + t * dir`, `t > 0`.
    ///
    /// Hits come in tree order, not sorted by `t`. Rays parallel to a
    /// triangle's plane do not hit it.
    pub fn ray_all_hits(
        &self,
        vertices: &[Point3<T>],
        elements: &[[usize; 3]],
        origin: &Point3<T>,
        dir: &Vector3<T>,
    ) -> Vec<Hit<T>> {
        let mut hits = Vec::new();
        if let Some(root) = self.root() {
            let ray = Ray::new(*origin, *dir);
            let epsilon = self.config().parallel_epsilon;
            all_hits_node(root, vertices, elements, &ray, epsilon, &mut hits);
        }
        hits
    }

    /// Returns the hit with the smallest `t > 0`, if any.
    pub fn ray_first_hit(
        &self,
        vertices: &[Point3<T>],
        elements: &[[usize; 3]],
        origin: &Point3<T>,
        dir: &Vector3<T>,
    ) -> Option<Hit<T>> {
        self.ray_first_hit_within(vertices, elements, origin, dir, T::INFINITY)
    }

    /// Returns the hit with the smallest `t` in `(0, min_t)`, if any.
    pub fn ray_first_hit_within(
        &self,
        vertices: &[Point3<T>],
        elements: &[[usize; 3]],
        origin: &Point3<T>,
        dir: &Vector3<T>,
        min_t: T,
    ) -> Option<Hit<T>> {
        let root = self.root()?;
        let ray = Ray::new(*origin, *dir);
        let epsilon = self.config().parallel_epsilon;
        let mut best = None;
        first_hit_node(root, vertices, elements, &ray, epsilon, min_t, &mut best);
        best
    }

    /// Runs [`ray_first_hit`](Self::ray_first_hit) for every pair of
    /// `origins[i]`, `dirs[i]`.
    ///
    /// Batches of at least `parallel_threshold` rays are spread over the
    /// rayon thread pool when the `parallel` feature is enabled.
    ///
    /// # Panics
    ///
    /// Panics if `origins` and `dirs` differ in length.
    pub fn ray_first_hits(
        &self,
        vertices: &[Point3<T>],
        elements: &[[usize; 3]],
        origins: &[Point3<T>],
        dirs: &[Vector3<T>],
    ) -> Vec<Option<Hit<T>>> {
        assert_eq!(
            origins.len(),
            dirs.len(),
            "Every ray needs one origin and one direction"
        );

        #[cfg(feature = "parallel")]
        if origins.len() >= self.config().parallel_threshold {
            trace!("ray_first_hits: {} rays in parallel", origins.len());
            return origins
                .par_iter()
                .zip(dirs.par_iter())
                .map(|(origin, dir)| self.ray_first_hit(vertices, elements, origin, dir))
                .collect();
        }

        trace!("ray_first_hits: {} rays sequentially", origins.len());
        origins
            .iter()
            .zip(dirs)
            .map(|(origin, dir)| self.ray_first_hit(vertices, elements, origin, dir))
            .collect()
    }
}

fn leaf_hit<T: Real>(
    primitive: usize,
    vertices: &[Point3<T>],
    elements: &[[usize; 3]],
    ray: &Ray<T, 3>,
    epsilon: T,
) -> Option<Hit<T>> {
    let [a, b, c] = elements[primitive];
    match ray_triangle_intersect(
        ray.origin(),
        ray.dir(),
        &vertices[a],
        &vertices[b],
        &vertices[c],
        epsilon,
    ) {
        TriangleIntersection::Hit { t, u, v } => Some(Hit {
            id: primitive,
            t,
            u,
            v,
        }),
        TriangleIntersection::Miss | TriangleIntersection::Parallel => None,
    }
}

fn all_hits_node<T: Real>(
    node: &AabbNode<T, 3>,
    vertices: &[Point3<T>],
    elements: &[[usize; 3]],
    ray: &Ray<T, 3>,
    epsilon: T,
    hits: &mut Vec<Hit<T>>,
) {
    if ray.intersect_box(node.bbox(), T::zero(), T::INFINITY).is_none() {
        return;
    }
    match node {
        AabbNode::Leaf { primitive, .. } => {
            hits.extend(leaf_hit(*primitive, vertices, elements, ray, epsilon));
        }
        AabbNode::Internal { left, right, .. } => {
            all_hits_node(left, vertices, elements, ray, epsilon, hits);
            all_hits_node(right, vertices, elements, ray, epsilon, hits);
        }
    }
}

/// Depth-first search that only enters boxes hit before the current best `t`.
fn first_hit_node<T: Real>(
    node: &AabbNode<T, 3>,
    vertices: &[Point3<T>],
    elements: &[[usize; 3]],
    ray: &Ray<T, 3>,
    epsilon: T,
    min_t: T,
    best: &mut Option<Hit<T>>,
) {
    let min_t = best.map_or(min_t, |hit| hit.t);
    if ray.intersect_box(node.bbox(), T::zero(), min_t).is_none() {
        return;
    }
    match node {
        AabbNode::Leaf { primitive, .. } => {
            if let Some(hit) = leaf_hit(*primitive, vertices, elements, ray, epsilon) {
                if hit.t < min_t {
                    *best = Some(hit);
                }
            }
        }
        AabbNode::Internal { left, right, .. } => {
            first_hit_node(left, vertices, elements, ray, epsilon, min_t, best);
            first_hit_node(right, vertices, elements, ray, epsilon, min_t, best);
        }
    }
}
