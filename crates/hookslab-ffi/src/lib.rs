//! C ABI for the hookslab callback registry.
//!
//! Native toolkits hold callbacks as a function pointer plus an opaque
//! user-data word. This crate supplies both halves: the trampolines a
//! binding layer passes as the function pointer, and a process-wide
//! registry whose [`Handle`](hookslab_core::Handle) tokens travel as the
//! user data. Trampolines look the token up, run the stored closure, and
//! report a [`HookStatus`]; they never unwind into native frames.
//!
//! The registry is a `static` because the trampolines are plain
//! `extern "C"` functions with no other way to reach it. Everything below
//! this crate works on owned registries.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a panic into `HookStatus::Panicked`.
///
/// `return` inside the body returns from the guarded closure, so early
/// exits read like ordinary status returns.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(status) => status,
            Err(_) => $crate::status::HookStatus::Panicked as i32,
        }
    };
}

/// Like `ffi_guard!`, for functions with no status to return.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => $default,
        }
    };
}


pub mod callback;
pub mod signal;
pub mod stats;
pub mod status;

pub use callback::{
    callbacks, hookslab_destroy_notify, hookslab_invoke, hookslab_invoke_once, hookslab_release,
    register, register_once, Callback, DestroyNotify, Trampoline,
};
pub use signal::{
    connect_signal, connected_signals, disconnect_signal, hookslab_disconnect_signal,
};
pub use stats::{hookslab_registry_stats, hookslab_shutdown, HookRegistryStats};
pub use status::HookStatus;
