//! Core types and traits for the hookslab callback registry.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: the [`Handle`]
//! token that crosses the FFI boundary, the error types, and the
//! [`CallbackStore`] trait describing the four-operation registry contract.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod handle;
pub mod traits;

pub use error::{ConfigError, RegistryError};
pub use handle::{Handle, SignalId};
pub use traits::CallbackStore;
