//! A single slab slot.

/// One entry of the slot table.
///
/// A free slot carries the index of the next free slot and nothing else,
/// so a released payload can never linger next to a free-list link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<T> {
    /// Holds a live payload.
    Occupied(T),
    /// Part of the free list. `next` is the following free slot, or the
    /// table length when this is the last one.
    Free {
        /// Index of the next free slot.
        next: usize,
    },
}

impl<T> Slot<T> {
    /// Whether the slot holds a payload.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    /// Borrow the payload, if any.
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Occupied(v) => Some(v),
            Self::Free { .. } => None,
        }
    }

    /// Mutably borrow the payload, if any.
    pub fn payload_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Occupied(v) => Some(v),
            Self::Free { .. } => None,
        }
    }
}
