//! Visitor pattern for box-overlap queries.
//!
//! Visitors receive the leaves whose boxes overlap a query box, without
//! coupling the traversal to what the caller does with them.

use crate::{BoundingBox, Real};

/// Visitor for processing leaves during a box-overlap traversal.
pub trait LeafVisitor<T: Real, const D: usize> {
    /// Called for each leaf whose box overlaps the query box.
    fn visit(&mut self, primitive: usize, bbox: &BoundingBox<T, D>);
}

/// A simple visitor that collects the primitive indices of visited leaves.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<usize>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected primitive indices.
    pub fn into_primitives(self) -> Vec<usize> {
        self.collected
    }

    /// Returns a reference to the collected primitive indices.
    pub fn primitives(&self) -> &[usize] {
        &self.collected
    }
}

impl<T: Real, const D: usize> LeafVisitor<T, D> for CollectingVisitor {
    fn visit(&mut self, primitive: usize, _bbox: &BoundingBox<T, D>) {
        self.collected.push(primitive);
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<T, const D: usize, F> LeafVisitor<T, D> for FnVisitor<F>
where
    T: Real,
    F: FnMut(usize, &BoundingBox<T, D>),
{
    fn visit(&mut self, primitive: usize, bbox: &BoundingBox<T, D>) {
        (self.func)(primitive, bbox);
    }
}
