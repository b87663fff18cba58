//! Rays and their intersection with boxes and triangles.

use nalgebra::{Point, Point3, SVector, Vector3};

use crate::{BoundingBox, Real};

/// A ray `origin + t * dir` with its inverse direction precomputed.
///
/// Building the ray once and reusing it for every box test of a traversal
/// avoids recomputing `1 / dir` per node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray<T: Real, const D: usize> {
    origin: Point<T, D>,
    dir: SVector<T, D>,
    inv_dir: SVector<T, D>,
}

impl<T: Real, const D: usize> Ray<T, D> {
    /// Creates a ray. The direction need not be normalized; `t` is measured in
    /// multiples of `dir`.
    pub fn new(origin: Point<T, D>, dir: SVector<T, D>) -> Self {
        let inv_dir = dir.map(|x| T::one() / x);
        Self {
            origin,
            dir,
            inv_dir,
        }
    }

    /// Returns the ray origin.
    #[inline]
    pub fn origin(&self) -> &Point<T, D> {
        &self.origin
    }

    /// Returns the ray direction.
    #[inline]
    pub fn dir(&self) -> &SVector<T, D> {
        &self.dir
    }

    /// Returns the point at parameter `t`.
    #[inline]
    pub fn at(&self, t: T) -> Point<T, D> {
        self.origin + self.dir * t
    }

    /// Intersects the ray with `bbox` using the slab method.
    ///
    /// Returns the entry and exit parameters `(tmin, tmax)` if the ray
    /// overlaps the box somewhere inside `(t0, t1)`, `None` otherwise. The
    /// returned interval is not clamped to `[t0, t1]`.
    pub fn intersect_box(&self, bbox: &BoundingBox<T, D>, t0: T, t1: T) -> Option<(T, T)> {
        let mut tmin = -T::INFINITY;
        let mut tmax = T::INFINITY;

        for i in 0..D {
            let lo = bbox.min()[i];
            let hi = bbox.max()[i];

            // Parallel to this slab: either always inside it or never
            if self.dir[i] == T::zero() {
                if self.origin[i] < lo || self.origin[i] > hi {
                    return None;
                }
                continue;
            }

            let mut near = (lo - self.origin[i]) * self.inv_dir[i];
            let mut far = (hi - self.origin[i]) * self.inv_dir[i];
            if self.inv_dir[i] < T::zero() {
                std::mem::swap(&mut near, &mut far);
            }

            if near > tmax || far < tmin {
                return None;
            }
            tmin = tmin.max(near);
            tmax = tmax.min(far);
        }

        (tmin < t1 && tmax > t0).then_some((tmin, tmax))
    }
}

/// Intersects the ray `origin + t * dir` with `bbox` within `(t0, t1)`.
///
/// Convenience for a single test; traversals should build a [`Ray`] once and
/// call [`Ray::intersect_box`] instead.
#[inline]
pub fn ray_box_intersect<T: Real, const D: usize>(
    origin: &Point<T, D>,
    dir: &SVector<T, D>,
    bbox: &BoundingBox<T, D>,
    t0: T,
    t1: T,
) -> Option<(T, T)> {
    Ray::new(*origin, *dir).intersect_box(bbox, t0, t1)
}

/// A ray hit on a mesh triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<T> {
    /// Index of the hit triangle in the element slice.
    pub id: usize,
    /// Ray parameter of the hit point.
    pub t: T,
    /// Barycentric weight of the triangle's second corner.
    pub u: T,
    /// Barycentric weight of the triangle's third corner.
    pub v: T,
}

/// Outcome of a ray/triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriangleIntersection<T> {
    /// The ray hits the triangle at `origin + t * dir`, with barycentric
    /// weights `(1 - u - v, u, v)`.
    Hit {
        /// Ray parameter, strictly positive.
        t: T,
        /// Weight of the second corner.
        u: T,
        /// Weight of the third corner.
        v: T,
    },
    /// The ray misses the triangle.
    Miss,
    /// The ray is (nearly) parallel to the triangle's plane. Coplanar overlap
    /// is not resolved.
    Parallel,
}

impl<T> TriangleIntersection<T> {
    /// Returns `true` for [`TriangleIntersection::Hit`].
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// The ray is classified [`Parallel`](TriangleIntersection::Parallel) when
/// `|dir · n| < epsilon`, where `n = (v1 - v0) × (v2 - v0)` is the unnormalized
/// triangle normal. Otherwise the hit must satisfy `u >= 0`, `v >= 0`,
/// `u + v <= 1` and `t > 0`.
pub fn ray_triangle_intersect<T: Real>(
    origin: &Point3<T>,
    dir: &Vector3<T>,
    v0: &Point3<T>,
    v1: &Point3<T>,
    v2: &Point3<T>,
    epsilon: T,
) -> TriangleIntersection<T> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let normal = edge1.cross(&edge2);

    // det = edge1 · (dir × edge2) = -(dir · normal)
    let det = -dir.dot(&normal);
    if det.abs() < epsilon {
        return TriangleIntersection::Parallel;
    }
    let inv_det = T::one() / det;

    let tvec = origin - v0;
    let pvec = dir.cross(&edge2);
    let u = tvec.dot(&pvec) * inv_det;
    if u < T::zero() || u > T::one() {
        return TriangleIntersection::Miss;
    }

    let qvec = tvec.cross(&edge1);
    let v = dir.dot(&qvec) * inv_det;
    if v < T::zero() || u + v > T::one() {
        return TriangleIntersection::Miss;
    }

    let t = edge2.dot(&qvec) * inv_det;
    if t <= T::zero() {
        return TriangleIntersection::Miss;
    }

    TriangleIntersection::Hit { t, u, v }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};

    fn unit_triangle() -> [Point3<f64>; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn unit_cube() -> BoundingBox<f64, 3> {
        BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn ray_through_box() {
        let hit = ray_box_intersect(
            &Point3::new(-1.0, 0.5, 0.5),
            &Vector3::new(1.0, 0.0, 0.0),
            &unit_cube(),
            0.0,
            f64::INFINITY,
        );
        assert_eq!(hit, Some((1.0, 2.0)));
    }

    #[test]
    fn ray_pointing_away_misses() {
        let hit = ray_box_intersect(
            &Point3::new(-1.0, 0.5, 0.5),
            &Vector3::new(-1.0, 0.0, 0.0),
            &unit_cube(),
            0.0,
            f64::INFINITY,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn ray_beyond_upper_bound_misses() {
        let ray = Ray::new(Point3::new(-1.0, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
        assert!(ray.intersect_box(&unit_cube(), 0.0, 0.5).is_none());
        assert!(ray.intersect_box(&unit_cube(), 0.0, 1.5).is_some());
    }

    #[test]
    fn axis_parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Point2::new(-1.0, 2.0), Vector2::new(1.0, 0.0));
        let bbox = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        assert!(ray.intersect_box(&bbox, 0.0, f64::INFINITY).is_none());

        let ray = Ray::new(Point2::new(-1.0, 0.5), Vector2::new(1.0, 0.0));
        assert_eq!(ray.intersect_box(&bbox, 0.0, f64::INFINITY), Some((1.0, 2.0)));
    }

    #[test]
    fn ray_from_inside_box_hits() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 0.0, -2.0));
        let (tmin, tmax) = ray.intersect_box(&unit_cube(), 0.0, f64::INFINITY).unwrap();
        assert!(tmin < 0.0);
        assert_eq!(tmax, 0.25);
    }

    #[test]
    fn empty_box_is_never_hit() {
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));
        assert!(ray.intersect_box(&BoundingBox::empty(), 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn triangle_hit_interior() {
        let [a, b, c] = unit_triangle();
        let result = ray_triangle_intersect(
            &Point3::new(0.25, 0.25, -1.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &a,
            &b,
            &c,
            1e-12,
        );
        assert_eq!(
            result,
            TriangleIntersection::Hit {
                t: 1.0,
                u: 0.25,
                v: 0.25
            }
        );
    }

    #[test]
    fn triangle_hit_at_corner() {
        let [a, b, c] = unit_triangle();
        let result = ray_triangle_intersect(
            &Point3::new(0.0, 0.0, -1.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &a,
            &b,
            &c,
            1e-12,
        );
        assert_eq!(
            result,
            TriangleIntersection::Hit {
                t: 1.0,
                u: 0.0,
                v: 0.0
            }
        );
    }

    #[test]
    fn triangle_behind_origin_misses() {
        let [a, b, c] = unit_triangle();
        let result = ray_triangle_intersect(
            &Point3::new(0.25, 0.25, 1.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &a,
            &b,
            &c,
            1e-12,
        );
        assert_eq!(result, TriangleIntersection::Miss);
    }

    #[test]
    fn triangle_outside_edges_misses() {
        let [a, b, c] = unit_triangle();
        let result = ray_triangle_intersect(
            &Point3::new(0.75, 0.75, -1.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &a,
            &b,
            &c,
            1e-12,
        );
        assert!(!result.is_hit());
    }

    #[test]
    fn coplanar_ray_is_parallel() {
        let [a, b, c] = unit_triangle();
        let result = ray_triangle_intersect(
            &Point3::new(-1.0, 0.25, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &a,
            &b,
            &c,
            1e-12,
        );
        assert_eq!(result, TriangleIntersection::Parallel);
    }

    #[test]
    fn ray_at() {
        let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.at(1.5), Point3::new(1.0, 3.0, 0.0));
    }
}
