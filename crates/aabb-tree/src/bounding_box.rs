//! Axis-aligned bounding boxes.

use nalgebra::{Point, SVector};

use crate::Real;

/// An axis-aligned box in `D` dimensions, described by its min and max corners.
///
/// A freshly created box is *empty* (`min = +inf`, `max = -inf`) and grows as
/// points are added with [`extend`](Self::extend). Once at least one point has
/// been added, `min <= max` holds componentwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<T: Real, const D: usize> {
    min: Point<T, D>,
    max: Point<T, D>,
}

impl<T: Real, const D: usize> BoundingBox<T, D> {
    /// Creates a box from its corners.
    ///
    /// # Panics (debug builds only)
    /// Panics if `min` exceeds `max` on any axis.
    pub fn new(min: Point<T, D>, max: Point<T, D>) -> Self {
        debug_assert!(
            (0..D).all(|i| min[i] <= max[i]),
            "Bounding box min corner must not exceed max corner"
        );
        Self { min, max }
    }

    /// Creates an empty box that contains nothing.
    pub fn empty() -> Self {
        Self {
            min: Point::from([T::INFINITY; D]),
            max: Point::from([-T::INFINITY; D]),
        }
    }

    /// Creates a degenerate box around a single point.
    #[inline]
    pub fn from_point(point: &Point<T, D>) -> Self {
        Self {
            min: *point,
            max: *point,
        }
    }

    /// Creates the smallest box containing all given points.
    ///
    /// Returns an empty box if the iterator yields nothing.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point<T, D>>,
    {
        let mut result = Self::empty();
        for point in points {
            result.extend(point);
        }
        result
    }

    /// Returns the min corner.
    #[inline]
    pub fn min(&self) -> &Point<T, D> {
        &self.min
    }

    /// Returns the max corner.
    #[inline]
    pub fn max(&self) -> &Point<T, D> {
        &self.max
    }

    /// Returns `true` if no point has been added to this box.
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.min[i] > self.max[i])
    }

    /// Grows the box so that it contains `point`.
    #[inline]
    pub fn extend(&mut self, point: &Point<T, D>) {
        for i in 0..D {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    /// Grows the box so that it contains `other`.
    #[inline]
    pub fn merge(&mut self, other: &Self) {
        for i in 0..D {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = *self;
        result.merge(other);
        result
    }

    /// Returns `true` if `point` lies inside the box or on its boundary.
    #[inline]
    pub fn contains(&self, point: &Point<T, D>) -> bool {
        (0..D).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Returns `true` if `other` lies entirely inside this box.
    #[inline]
    pub fn contains_box(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }

    /// Returns `true` if the two boxes overlap (touching counts).
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// Returns the vector from the min corner to the max corner.
    #[inline]
    pub fn diagonal(&self) -> SVector<T, D> {
        self.max - self.min
    }

    /// Returns the center of the box.
    #[inline]
    pub fn center(&self) -> Point<T, D> {
        self.min + self.diagonal() * T::lit(0.5)
    }

    /// Returns the index of the axis with the largest extent.
    ///
    /// When several axes share the largest extent the lowest index wins.
    pub fn longest_axis(&self) -> usize {
        let diagonal = self.diagonal();
        let mut axis = 0;
        for i in 1..D {
            if diagonal[i] > diagonal[axis] {
                axis = i;
            }
        }
        axis
    }

    /// Squared distance from `point` to the nearest point of the box.
    ///
    /// Zero when the point is inside the box.
    pub fn squared_exterior_distance(&self, point: &Point<T, D>) -> T {
        let mut result = T::zero();
        for i in 0..D {
            let delta = if point[i] < self.min[i] {
                self.min[i] - point[i]
            } else if point[i] > self.max[i] {
                point[i] - self.max[i]
            } else {
                continue;
            };
            result += delta * delta;
        }
        result
    }
}

impl<T: Real, const D: usize> Default for BoundingBox<T, D> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Point3};

    fn unit_cube() -> BoundingBox<f64, 3> {
        BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn empty_box_contains_nothing() {
        let bbox = BoundingBox::<f64, 3>::empty();
        assert!(bbox.is_empty());
        assert!(!bbox.contains(&Point3::origin()));
    }

    #[test]
    fn extend_grows_box() {
        let mut bbox = BoundingBox::<f32, 2>::empty();
        bbox.extend(&Point2::new(1.0, -1.0));
        assert!(!bbox.is_empty());
        bbox.extend(&Point2::new(-2.0, 3.0));

        assert_eq!(*bbox.min(), Point2::new(-2.0, -1.0));
        assert_eq!(*bbox.max(), Point2::new(1.0, 3.0));
    }

    #[test]
    fn from_points_matches_extend() {
        let points = [Point3::new(1.0, 2.0, 3.0), Point3::new(-1.0, 0.5, 4.0)];
        let bbox = BoundingBox::from_points(&points);
        assert_eq!(*bbox.min(), Point3::new(-1.0, 0.5, 3.0));
        assert_eq!(*bbox.max(), Point3::new(1.0, 2.0, 4.0));
    }

    #[test]
    fn contains_is_inclusive() {
        let bbox = unit_cube();
        assert!(bbox.contains(&Point3::new(0.0, 0.5, 1.0)));
        assert!(!bbox.contains(&Point3::new(0.0, 0.5, 1.0 + 1e-9)));
    }

    #[test]
    fn union_and_intersection() {
        let a = unit_cube();
        let b = BoundingBox::new(Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0));
        let c = BoundingBox::new(Point3::new(3.0, 0.0, 0.0), Point3::new(4.0, 1.0, 1.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));

        let u = a.union(&c);
        assert!(u.contains_box(&a));
        assert!(u.contains_box(&c));
        assert_eq!(*u.max(), Point3::new(4.0, 1.0, 1.0));
    }

    #[test]
    fn longest_axis_prefers_lowest_index_on_ties() {
        let cube = unit_cube();
        assert_eq!(cube.longest_axis(), 0);

        let tall = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 5.0));
        assert_eq!(tall.longest_axis(), 2);
    }

    #[test]
    fn squared_exterior_distance() {
        let bbox = unit_cube();
        assert_eq!(bbox.squared_exterior_distance(&Point3::new(0.5, 0.5, 0.5)), 0.0);
        assert_eq!(bbox.squared_exterior_distance(&Point3::new(2.0, 0.5, 0.5)), 1.0);
        // Corner region: both x and y contribute
        assert_eq!(bbox.squared_exterior_distance(&Point3::new(-1.0, 3.0, 0.5)), 5.0);
    }

    #[test]
    fn center_and_diagonal() {
        let bbox = BoundingBox::new(Point2::new(-1.0, 0.0), Point2::new(3.0, 2.0));
        assert_eq!(bbox.center(), Point2::new(1.0, 1.0));
        assert_eq!(bbox.diagonal().x, 4.0);
    }
}
