//! Hookslab: a handle registry for calling Rust closures from native code.
//!
//! Native toolkits carry callback context as one opaque pointer-sized word.
//! Hookslab stores the closure on the Rust side and gives the toolkit a
//! small integer [`Handle`](types::Handle) instead of a pointer, so a stale
//! or duplicated callback resolves to nothing rather than to freed memory.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all hookslab sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use hookslab::prelude::*;
//! use std::sync::Arc;
//!
//! type Cb = Arc<dyn Fn(i32) -> i32 + Send + Sync>;
//!
//! let registry: Registry<Cb> = Registry::new();
//! let double: Cb = Arc::new(|x: i32| x * 2);
//! let handle = registry.assign(double);
//!
//! // What a native trampoline does with its user-data word.
//! let user_data = handle.into_user_data();
//! let cb = registry.get(Handle::from_user_data(user_data)).unwrap();
//! assert_eq!(cb(21), 42);
//!
//! // One-shot sources take the payload out as they fire.
//! assert!(registry.get_and_delete(handle).is_some());
//! assert!(registry.get(handle).is_none());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `hookslab-core` | `Handle`, `SignalId`, errors, `CallbackStore` |
//! | [`slab`] | `hookslab-slab` | Free-list slot allocator |
//! | [`registry`] | `hookslab-registry` | Locked and sharded registries, signal table |
//! | [`ffi`] | `hookslab-ffi` | C trampolines and the process-wide registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors, and the store trait (`hookslab-core`).
pub use hookslab_core as types;

/// Single-threaded slot allocator (`hookslab-slab`).
pub use hookslab_slab as slab;

/// Thread-safe registries and signal bookkeeping (`hookslab-registry`).
///
/// [`registry::Registry`] for the common case, [`registry::ShardedRegistry`]
/// when many threads register and release at once.
pub use hookslab_registry as registry;

/// C ABI trampolines and the process-wide registry (`hookslab-ffi`).
pub use hookslab_ffi as ffi;

/// Common imports for typical hookslab usage.
///
/// ```rust
/// use hookslab::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use hookslab_core::{CallbackStore, Handle, SignalId};

    // Errors
    pub use hookslab_core::{ConfigError, RegistryError};

    // Registries
    pub use hookslab_registry::{
        Registry, RegistryConfig, RegistryMetrics, ShardedRegistry, SignalTable,
    };

    // FFI
    pub use hookslab_ffi::HookStatus;
}
