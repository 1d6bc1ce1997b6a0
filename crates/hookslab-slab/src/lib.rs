//! Free-list slot allocator for callback payloads.
//!
//! [`Slab`] maps dense integer handles to payloads. It is single-threaded;
//! the registry crate wraps it in a lock.
//!
//! # Layout
//!
//! ```text
//! slots:     [ Occupied(a) | Free{next: 3} | Occupied(b) | Free{next: 4} ]
//! free_head: 1 ──► 3 ──► 4 (== slots.len(), end of list)
//! ```
//!
//! Freed slots are threaded into a singly linked list through their own
//! storage and recycled before the table grows. The table never shrinks,
//! so a handle's width is fixed for the lifetime of the slab.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod slab;
pub mod slot;

pub use slab::{Slab, SlabStats};
pub use slot::Slot;
