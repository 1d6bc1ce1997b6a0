//! The slot table: [`Slab`] and its [`SlabStats`] snapshot.

use hookslab_core::{Handle, RegistryError};

use crate::slot::Slot;

/// Point-in-time occupancy of a [`Slab`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlabStats {
    /// Total slots ever allocated (the table never shrinks).
    pub slots: usize,
    /// Slots currently holding a payload.
    pub live: usize,
    /// Slots on the free list.
    pub free: usize,
}

/// Free-list slot allocator mapping [`Handle`]s to payloads.
///
/// `put`, `get` and `pop` are O(1) (`put` amortized, when the table has to
/// grow). A freshly constructed slab is empty with `free_head == 0`, which
/// is also "free list empty" because the table length is zero.
///
/// Not thread-safe; see `hookslab-registry` for the locked facade.
#[derive(Debug)]
pub struct Slab<T> {
    /// Slot storage. Indices are handles.
    slots: Vec<Slot<T>>,
    /// Head of the free list, or `slots.len()` when the list is empty.
    free_head: usize,
    /// Number of occupied slots.
    live: usize,
}

impl<T> Slab<T> {
    /// Create an empty slab. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: 0,
            live: 0,
        }
    }

    /// Create an empty slab with room for `capacity` slots before the
    /// backing storage reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: 0,
            live: 0,
        }
    }

    /// Store `payload` and return its handle.
    ///
    /// Recycles the most recently freed slot if there is one, otherwise
    /// appends a new slot.
    pub fn put(&mut self, payload: T) -> Handle {
        let index = self.free_head;
        self.live += 1;

        if let Some(Slot::Free { next }) = self.slots.get(index) {
            let next = *next;
            self.slots[index] = Slot::Occupied(payload);
            self.free_head = next;
            return Handle(index);
        }

        debug_assert_eq!(index, self.slots.len(), "free list head is occupied");
        let index = self.slots.len();
        self.slots.push(Slot::Occupied(payload));
        self.free_head = self.slots.len();
        Handle(index)
    }

    /// Borrow the payload behind `handle`.
    ///
    /// Returns `None` if the handle is out of range or its slot is free.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.0)?.payload()
    }

    /// Mutably borrow the payload behind `handle`.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots.get_mut(handle.0)?.payload_mut()
    }

    /// Whether `handle` currently names a payload.
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Release `handle` and return its payload.
    ///
    /// Out-of-range and already-free handles are a no-op returning `None`;
    /// a double free never touches the free list.
    pub fn pop(&mut self, handle: Handle) -> Option<T> {
        self.try_pop(handle).ok()
    }

    /// Release `handle`, reporting why it could not be released.
    pub fn try_pop(&mut self, handle: Handle) -> Result<T, RegistryError> {
        let slots = self.slots.len();
        let slot = self
            .slots
            .get_mut(handle.0)
            .ok_or(RegistryError::UnknownHandle { handle, slots })?;

        let next = self.free_head;
        match std::mem::replace(slot, Slot::Free { next }) {
            Slot::Occupied(payload) => {
                self.free_head = handle.0;
                self.live -= 1;
                Ok(payload)
            }
            vacant @ Slot::Free { .. } => {
                *slot = vacant;
                Err(RegistryError::Vacant { handle })
            }
        }
    }

    /// Release every live handle, returning the payloads in handle order.
    ///
    /// Slots go back on the free list; the table keeps its length.
    pub fn drain(&mut self) -> Vec<(Handle, T)> {
        let mut out = Vec::with_capacity(self.live);
        for index in 0..self.slots.len() {
            let handle = Handle(index);
            if let Some(payload) = self.pop(handle) {
                out.push((handle, payload));
            }
        }
        out
    }

    /// Drop every payload. Equivalent to discarding [`drain`](Self::drain).
    pub fn clear(&mut self) {
        self.drain();
    }

    /// Iterate over live `(handle, payload)` pairs in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.payload().map(|p| (Handle(i), p)))
    }

    /// Total slot count, live or free.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of live payloads.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of slots on the free list.
    pub fn free_count(&self) -> usize {
        self.slots.len() - self.live
    }

    /// Whether no payload is live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Occupancy snapshot.
    pub fn stats(&self) -> SlabStats {
        SlabStats {
            slots: self.len(),
            live: self.live,
            free: self.free_count(),
        }
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}
