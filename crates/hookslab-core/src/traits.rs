//! The four-operation registry contract.

use crate::handle::Handle;

/// Storage that maps [`Handle`] tokens to callback payloads.
///
/// This is the whole surface the binding layer relies on. The trampoline
/// picks the operation by the event source's firing cadence:
///
/// - recurring sources (signals, foreach/compare functions) resolve with
///   [`get`](CallbackStore::get) and are released later with
///   [`delete`](CallbackStore::delete), usually from a destroy-notify;
/// - one-shot sources (idle, timeout, async-ready) resolve and retire in a
///   single step with [`get_and_delete`](CallbackStore::get_and_delete).
///
/// None of the operations panic or report errors for dead handles.
pub trait CallbackStore<T>: Send + Sync {
    /// Store a payload and return the token that names it.
    fn assign(&self, payload: T) -> Handle;

    /// Resolve a token without releasing it.
    ///
    /// Returns `None` for handles that were never issued or were already
    /// released.
    fn get(&self, handle: Handle) -> Option<T>
    where
        T: Clone;

    /// Release a token, dropping its payload. Dead handles are ignored.
    fn delete(&self, handle: Handle);

    /// Release a token and hand back its payload.
    ///
    /// Atomic with respect to every other operation: of two concurrent
    /// calls on the same handle, exactly one receives the payload.
    fn get_and_delete(&self, handle: Handle) -> Option<T>;
}
