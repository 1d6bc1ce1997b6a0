//! Test utilities for hookslab development.
//!
//! Provides payload fixtures and a [`MockEventSource`] that plays the part
//! of a native toolkit: it stores `(trampoline, user_data)` pairs the way a
//! C library does and fires them later, optionally from several threads.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod source;

pub use fixtures::{labels, CallCounter};
pub use source::{DestroyNotify, Emission, MockEventSource, Trampoline};
