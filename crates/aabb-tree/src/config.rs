//! Query tolerances and batching thresholds.

use crate::Real;

/// Number of query points (or rays) from which batched queries run in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

/// Tunables stored in a tree at construction.
///
/// Defaults come from the scalar type (see [`Real`]), so `f32` trees get
/// looser tolerances than `f64` trees.
///
/// ```
/// use aabb_tree::TreeConfig;
///
/// let config = TreeConfig::<f64>::default()
///     .with_containment_epsilon(1e-10)
///     .with_parallel_threshold(256);
/// assert_eq!(config.parallel_threshold, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig<T: Real> {
    /// Slack on the barycentric weights of a containment test. A point is
    /// inside a simplex when every normalized sub-volume is `>= -epsilon`.
    pub containment_epsilon: T,
    /// Rays with `|dir · n|` below this are treated as parallel to a triangle.
    pub parallel_epsilon: T,
    /// Batch size from which batched queries are dispatched to rayon.
    pub parallel_threshold: usize,
}

impl<T: Real> TreeConfig<T> {
    /// Sets the containment tolerance.
    #[must_use]
    pub fn with_containment_epsilon(mut self, epsilon: T) -> Self {
        self.containment_epsilon = epsilon;
        self
    }

    /// Sets the ray/triangle parallel threshold.
    #[must_use]
    pub fn with_parallel_epsilon(mut self, epsilon: T) -> Self {
        self.parallel_epsilon = epsilon;
        self
    }

    /// Sets the batch size from which batched queries run in parallel.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

impl<T: Real> Default for TreeConfig<T> {
    fn default() -> Self {
        Self {
            containment_epsilon: T::CONTAINMENT_EPSILON,
            parallel_epsilon: T::PARALLEL_EPSILON,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_scalar() {
        let single = TreeConfig::<f32>::default();
        assert_eq!(single.containment_epsilon, 1.0e-7);
        assert_eq!(single.parallel_epsilon, 1.0e-6);

        let double = TreeConfig::<f64>::default();
        assert_eq!(double.containment_epsilon, 1.0e-14);
        assert_eq!(double.parallel_epsilon, 1.0e-12);
        assert_eq!(double.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn builder_overrides() {
        let config = TreeConfig::<f64>::default()
            .with_containment_epsilon(0.5)
            .with_parallel_epsilon(0.25)
            .with_parallel_threshold(0);

        assert_eq!(config.containment_epsilon, 0.5);
        assert_eq!(config.parallel_epsilon, 0.25);
        assert_eq!(config.parallel_threshold, 0);
    }
}
