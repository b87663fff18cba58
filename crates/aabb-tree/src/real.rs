//! Scalar abstraction over `f32` and `f64`.

use nalgebra::RealField;

/// Floating point scalar the tree and its kernels are generic over.
///
/// Besides the arithmetic provided by [`RealField`], this carries the
/// constants the queries need and the default tolerances for each precision.
pub trait Real: RealField + Copy + Send + Sync {
    /// Positive infinity, used as the open upper bound of distance and ray queries.
    const INFINITY: Self;

    /// Default tolerance for the signed sub-volume test of containment queries.
    const CONTAINMENT_EPSILON: Self;

    /// Default threshold below which a ray is considered parallel to a triangle.
    const PARALLEL_EPSILON: Self;

    /// Converts an `f64` literal into this scalar.
    fn lit(value: f64) -> Self;
}

macro_rules! impl_real {
    ($s: ty, $containment: expr, $parallel: expr) => {
        impl Real for $s {
            const INFINITY: Self = <$s>::INFINITY;
            const CONTAINMENT_EPSILON: Self = $containment;
            const PARALLEL_EPSILON: Self = $parallel;

            #[inline]
            fn lit(value: f64) -> Self {
                value as $s
            }
        }
    };
}

impl_real!(f32, 1.0e-7, 1.0e-6);
impl_real!(f64, 1.0e-14, 1.0e-12);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinity_dominates() {
        assert!(f32::INFINITY > f32::MAX);
        assert!(<f64 as Real>::INFINITY > 1.0e300);
    }

    #[test]
    fn lit_converts() {
        assert_eq!(<f32 as Real>::lit(0.25), 0.25_f32);
        assert_eq!(<f64 as Real>::lit(6.0), 6.0_f64);
    }

    #[test]
    fn single_precision_tolerances_are_looser() {
        assert!(f64::from(<f32 as Real>::CONTAINMENT_EPSILON) > <f64 as Real>::CONTAINMENT_EPSILON);
        assert!(f64::from(<f32 as Real>::PARALLEL_EPSILON) > <f64 as Real>::PARALLEL_EPSILON);
    }
}
