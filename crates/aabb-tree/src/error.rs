//! Errors returned when reconstructing a tree from external data.

use thiserror::Error;

/// Failure to rebuild a tree from a [`SerializedTree`](crate::SerializedTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The `mins`, `maxs` and `ids` arrays differ in length.
    #[error("serialized arrays differ in length: {mins} mins, {maxs} maxs, {ids} ids")]
    LengthMismatch {
        mins: usize,
        maxs: usize,
        ids: usize,
    },

    /// An internal node points to a child slot past the end of the arrays.
    #[error("internal node at slot {parent} has no child slot {slot} (array length {len})")]
    MissingSlot {
        parent: usize,
        slot: usize,
        len: usize,
    },

    /// A reached slot holds a box whose min corner exceeds its max corner.
    #[error("slot {slot} holds an inverted or empty box")]
    InvalidBox { slot: usize },

    /// A slot holds a negative id other than the internal-node sentinel.
    #[error("slot {slot} holds invalid id {id}")]
    InvalidId { slot: usize, id: isize },

    /// A leaf refers to a primitive the element slice does not have.
    #[error("slot {slot} refers to primitive {primitive}, but only {count} elements exist")]
    PrimitiveOutOfRange {
        slot: usize,
        primitive: usize,
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_slot() {
        let error = TreeError::PrimitiveOutOfRange {
            slot: 4,
            primitive: 12,
            count: 3,
        };
        assert_eq!(
            error.to_string(),
            "slot 4 refers to primitive 12, but only 3 elements exist"
        );

        let error = TreeError::InvalidId { slot: 0, id: -7 };
        assert_eq!(error.to_string(), "slot 0 holds invalid id -7");
    }
}
