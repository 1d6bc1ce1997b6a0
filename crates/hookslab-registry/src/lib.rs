//! Thread-safe callback handle registry.
//!
//! Lets native code call back into Rust closures when the only context a
//! native callback can carry is an opaque "user data" word. The binding
//! layer stores a closure with [`Registry::assign`], hands the returned
//! [`Handle`] to the native API, and the native-side trampoline resolves it
//! again with [`Registry::get`] (recurring sources) or
//! [`Registry::get_and_delete`] (one-shot sources).
//!
//! # Architecture
//!
//! ```text
//! Registry<T>
//! └── RwLock<Slab<T>>      shared for get, exclusive for assign/delete
//!
//! ShardedRegistry<T>
//! └── Registry<T> × N       handle = local * N + shard
//!
//! SignalTable               SignalId ⇄ Handle, for signal disconnects
//! ```
//!
//! Every critical section is a single O(1) slab call. Closures are invoked
//! and payloads are dropped after the lock is released, so callbacks may
//! re-enter the registry.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod registry;
pub mod sharded;
pub mod signal;

pub use config::RegistryConfig;
pub use hookslab_core::{CallbackStore, ConfigError, Handle, RegistryError, SignalId};
pub use metrics::RegistryMetrics;
pub use registry::Registry;
pub use sharded::ShardedRegistry;
pub use signal::SignalTable;
