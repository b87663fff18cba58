//! Point/simplex geometry: barycentric coordinates, closest points and signed measures.
//!
//! A simplex is given by indices into a vertex slice: `[usize; 1]` for points,
//! `[usize; 2]` for segments and `[usize; 3]` for triangles. Segments and points
//! reuse the triangle routines with repeated corners (`element[j % K]`), so the
//! same Voronoi-region tests serve all three arities.

use nalgebra::{Point, Point2, Point3};

use crate::Real;

/// Returns the barycenter of a simplex.
pub fn simplex_barycenter<T: Real, const D: usize, const K: usize>(
    vertices: &[Point<T, D>],
    element: &[usize; K],
) -> Point<T, D> {
    let mut sum = Point::<T, D>::origin().coords;
    for &index in element {
        sum += vertices[index].coords;
    }
    Point::from(sum / T::lit(K as f64))
}

/// Twice the signed area of the 2D triangle `(a, b, c)`.
///
/// Positive for counter-clockwise winding.
#[inline]
pub fn triangle_double_area<T: Real>(a: &Point2<T>, b: &Point2<T>, c: &Point2<T>) -> T {
    let r = a - c;
    let s = b - c;
    r.x * s.y - r.y * s.x
}

/// Signed volume of the tetrahedron `(a, b, c, d)`.
///
/// Positive when `d` lies on the side of the plane `(a, b, c)` opposite to the
/// normal `(b - a) × (c - a)`.
#[inline]
pub fn tetrahedron_volume<T: Real>(
    a: &Point3<T>,
    b: &Point3<T>,
    c: &Point3<T>,
    d: &Point3<T>,
) -> T {
    let ad = a - d;
    let bd = b - d;
    let cd = c - d;
    -ad.dot(&bd.cross(&cd)) / T::lit(6.0)
}

/// Projects `point` onto the infinite line through `start` and `end`.
///
/// Returns the line parameter `t` (unclamped: values outside `[0, 1]` lie
/// beyond an endpoint) and the squared distance from `point` to the projection.
/// A zero-length segment projects everything onto `start` (`t = 0`).
pub fn project_to_line_segment<T: Real, const D: usize>(
    point: &Point<T, D>,
    start: &Point<T, D>,
    end: &Point<T, D>,
) -> (T, T) {
    let direction = end - start;
    let length_squared = direction.norm_squared();
    let t = if length_squared > T::zero() {
        (point - start).dot(&direction) / length_squared
    } else {
        T::zero()
    };
    let projection = start + direction * t;
    (t, (point - projection).norm_squared())
}

/// Barycentric coordinates of `point` with respect to the triangle `(a, b, c)`.
///
/// The point is projected onto the triangle's plane; the weights sum to one.
/// For a degenerate triangle (collinear or coincident corners) the weights of
/// the closest point on the triangle are returned, so the result is always
/// finite.
pub fn barycentric_coordinates<T: Real, const D: usize>(
    point: &Point<T, D>,
    a: &Point<T, D>,
    b: &Point<T, D>,
    c: &Point<T, D>,
) -> [T; 3] {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = point - a;
    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);
    let denom = d00 * d11 - d01 * d01;

    if denom <= T::zero() {
        return closest_point_on_triangle(point, a, b, c).1;
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    [T::one() - v - w, v, w]
}

/// Row-wise [`barycentric_coordinates`] over equally long slices.
///
/// # Panics
/// Panics if the slices differ in length.
pub fn barycentric_coordinates_rows<T: Real, const D: usize>(
    points: &[Point<T, D>],
    a: &[Point<T, D>],
    b: &[Point<T, D>],
    c: &[Point<T, D>],
) -> Vec<[T; 3]> {
    assert!(
        points.len() == a.len() && a.len() == b.len() && b.len() == c.len(),
        "Barycentric rows must have matching lengths"
    );
    points
        .iter()
        .zip(a)
        .zip(b)
        .zip(c)
        .map(|(((p, a), b), c)| barycentric_coordinates(p, a, b, c))
        .collect()
}

/// Barycentric coordinates of `point` with respect to the tetrahedron `(a, b, c, d)`.
///
/// Each weight is the signed volume of the sub-tetrahedron opposite a corner
/// divided by the total volume. A zero-volume tetrahedron yields uniform
/// weights; check [`tetrahedron_volume`] to detect that case.
pub fn tetrahedron_barycentric_coordinates<T: Real>(
    point: &Point3<T>,
    a: &Point3<T>,
    b: &Point3<T>,
    c: &Point3<T>,
    d: &Point3<T>,
) -> [T; 4] {
    let total = tetrahedron_volume(a, b, c, d);
    if total == T::zero() {
        return [T::lit(0.25); 4];
    }
    [
        tetrahedron_volume(point, b, c, d) / total,
        tetrahedron_volume(a, point, c, d) / total,
        tetrahedron_volume(a, b, point, d) / total,
        tetrahedron_volume(a, b, c, point) / total,
    ]
}

/// Squared distance from `point` to simplex `index` of `elements`, and the closest point.
///
/// # Panics
/// Panics if the simplex arity `K` is not 1, 2 or 3.
#[inline]
pub fn point_simplex_squared_distance<T: Real, const D: usize, const K: usize>(
    point: &Point<T, D>,
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    index: usize,
) -> (T, Point<T, D>) {
    let (squared_distance, closest, _) =
        point_simplex_squared_distance_barycentric(point, vertices, elements, index);
    (squared_distance, closest)
}

/// Like [`point_simplex_squared_distance`], also returning the barycentric
/// weights of the closest point.
///
/// Weights are padded to three entries: `[wa, wb, 0]` for segments and
/// `[1, 0, 0]` for points.
///
/// # Panics
/// Panics if the simplex arity `K` is not 1, 2 or 3.
pub fn point_simplex_squared_distance_barycentric<T: Real, const D: usize, const K: usize>(
    point: &Point<T, D>,
    vertices: &[Point<T, D>],
    elements: &[[usize; K]],
    index: usize,
) -> (T, Point<T, D>, [T; 3]) {
    assert!(
        (1..=3).contains(&K),
        "Point/simplex distance supports points, segments and triangles only"
    );
    let element = &elements[index];
    let a = &vertices[element[0]];
    let b = &vertices[element[1 % K]];
    let c = &vertices[element[2 % K]];

    let (closest, weights) = closest_point_on_triangle(point, a, b, c);
    let weights = match K {
        1 => [T::one(), T::zero(), T::zero()],
        // The third corner of a segment is its first one again
        2 => [weights[0] + weights[2], weights[1], T::zero()],
        _ => weights,
    };
    ((point - closest).norm_squared(), closest, weights)
}

/// Closest point on triangle `(a, b, c)` to `p`, with its barycentric weights.
///
/// Follows Ericson, "Real-Time Collision Detection", 5.1.5: vertex regions,
/// then edge regions, then the face region. The denominator of each edge test
/// is that edge's squared length, so zero-length edges are skipped and their
/// points are handled by the vertex and remaining edge regions.
pub(crate) fn closest_point_on_triangle<T: Real, const D: usize>(
    p: &Point<T, D>,
    a: &Point<T, D>,
    b: &Point<T, D>,
    c: &Point<T, D>,
) -> (Point<T, D>, [T; 3]) {
    let zero = T::zero();
    let one = T::one();

    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= zero && d2 <= zero {
        return (*a, [one, zero, zero]);
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= zero && d4 <= d3 {
        return (*b, [zero, one, zero]);
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= zero && d1 >= zero && d3 <= zero && d1 - d3 > zero {
        let v = d1 / (d1 - d3);
        return (a + ab * v, [one - v, v, zero]);
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= zero && d5 <= d6 {
        return (*c, [zero, zero, one]);
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= zero && d2 >= zero && d6 <= zero && d2 - d6 > zero {
        let w = d2 / (d2 - d6);
        return (a + ac * w, [one - w, zero, w]);
    }

    let va = d3 * d6 - d5 * d4;
    let bc_length_squared = (d4 - d3) + (d5 - d6);
    if va <= zero && d4 - d3 >= zero && d5 - d6 >= zero && bc_length_squared > zero {
        let w = (d4 - d3) / bc_length_squared;
        return (b + (c - b) * w, [zero, one - w, w]);
    }

    let denom = va + vb + vc;
    if denom <= zero {
        // Degenerate triangle: no face region exists.
        return closest_point_on_edges(p, a, b, c);
    }
    let v = vb / denom;
    let w = vc / denom;
    (a + ab * v + ac * w, [one - v - w, v, w])
}

/// Closest point over the three edges of a (degenerate) triangle.
fn closest_point_on_edges<T: Real, const D: usize>(
    p: &Point<T, D>,
    a: &Point<T, D>,
    b: &Point<T, D>,
    c: &Point<T, D>,
) -> (Point<T, D>, [T; 3]) {
    let zero = T::zero();
    let one = T::one();
    let clamp = |t: T| t.max(zero).min(one);

    let (t_ab, _) = project_to_line_segment(p, a, b);
    let (t_bc, _) = project_to_line_segment(p, b, c);
    let (t_ca, _) = project_to_line_segment(p, c, a);
    let (t_ab, t_bc, t_ca) = (clamp(t_ab), clamp(t_bc), clamp(t_ca));

    let candidates = [
        (a + (b - a) * t_ab, [one - t_ab, t_ab, zero]),
        (b + (c - b) * t_bc, [zero, one - t_bc, t_bc]),
        (c + (a - c) * t_ca, [t_ca, zero, one - t_ca]),
    ];

    let mut best = candidates[0];
    let mut best_distance = (p - best.0).norm_squared();
    for candidate in &candidates[1..] {
        let distance = (p - candidate.0).norm_squared();
        if distance < best_distance {
            best = *candidate;
            best_distance = distance;
        }
    }
    best
}
