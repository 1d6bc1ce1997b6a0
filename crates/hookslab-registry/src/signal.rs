//! Bidirectional bookkeeping between native signal ids and registry handles.
//!
//! A recurring signal connection owns two identifiers: the [`SignalId`] the
//! toolkit returned from its connect call, and the [`Handle`] the registry
//! issued for the closure. The user tears the connection down by signal id,
//! while the toolkit's destroy-notify only knows the handle. [`SignalTable`]
//! maps both ways so either path cleans up the other.

use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use hookslab_core::{CallbackStore, Handle, SignalId};

/// Both directions of every link. Removals shift, so iteration stays in
/// connect order.
#[derive(Debug, Default)]
struct Links {
    by_signal: IndexMap<SignalId, Handle>,
    by_handle: IndexMap<Handle, SignalId>,
}

impl Links {
    fn link(&mut self, signal: SignalId, handle: Handle) {
        if let Some(old_handle) = self.by_signal.insert(signal, handle) {
            if old_handle != handle {
                self.by_handle.shift_remove(&old_handle);
            }
        }
        if let Some(old_signal) = self.by_handle.insert(handle, signal) {
            if old_signal != signal {
                self.by_signal.shift_remove(&old_signal);
            }
        }
    }

    fn unlink_handle(&mut self, handle: Handle) -> Option<SignalId> {
        let signal = self.by_handle.shift_remove(&handle)?;
        self.by_signal.shift_remove(&signal);
        Some(signal)
    }
}

/// `SignalId` ⇄ `Handle` map guarded by a single mutex.
///
/// Both directions are updated under the same lock, so they never disagree.
/// Operations that release a payload do so while holding this lock; the
/// lock order is always table first, then store.
#[derive(Debug, Default)]
pub struct SignalTable {
    links: Mutex<Links>,
}

impl SignalTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Links> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Associate `signal` with `handle`.
    ///
    /// Any older association of either key is dropped first.
    pub fn register(&self, signal: SignalId, handle: Handle) {
        self.lock().link(signal, handle);
    }

    /// Associate `signal` with `handle` only if `still_live` holds.
    ///
    /// `still_live` runs under the table lock, so a concurrent
    /// [`forget_handle_with`](Self::forget_handle_with) on the same handle
    /// either completes before the check or waits until the link exists.
    /// Returns whether the link was made.
    pub fn register_if(
        &self,
        signal: SignalId,
        handle: Handle,
        still_live: impl FnOnce() -> bool,
    ) -> bool {
        let mut links = self.lock();
        if !still_live() {
            return false;
        }
        links.link(signal, handle);
        true
    }

    /// Forget `signal` and release its payload from `store`.
    ///
    /// Call after the toolkit-side disconnect. Returns `false` if the signal
    /// was unknown (already disconnected, or its payload already released).
    pub fn disconnect<T, S>(&self, signal: SignalId, store: &S) -> bool
    where
        S: CallbackStore<T> + ?Sized,
    {
        let (handle, payload) = {
            let mut links = self.lock();
            let Some(handle) = links.by_signal.shift_remove(&signal) else {
                return false;
            };
            links.by_handle.shift_remove(&handle);
            // Released before unlocking: a destroy-notify for this handle
            // must not free the slot and let it be reissued in between.
            (handle, store.get_and_delete(handle))
        };
        tracing::trace!(%signal, %handle, "signal disconnected");
        drop(payload);
        true
    }

    /// Forget the association of `handle`, returning its signal.
    ///
    /// Used when the payload was released by a destroy-notify rather than
    /// by [`disconnect`](Self::disconnect).
    pub fn forget_handle(&self, handle: Handle) -> Option<SignalId> {
        self.lock().unlink_handle(handle)
    }

    /// Forget the association of `handle` and run `release` before the
    /// table lock is dropped.
    ///
    /// `release` typically takes the payload out of the store; return it
    /// rather than dropping it inside, so its destructor runs unlocked.
    pub fn forget_handle_with<R>(
        &self,
        handle: Handle,
        release: impl FnOnce() -> R,
    ) -> (Option<SignalId>, R) {
        let mut links = self.lock();
        let signal = links.unlink_handle(handle);
        (signal, release())
    }

    /// Disconnect every signal, releasing all payloads from `store`.
    ///
    /// Returns the signal ids in connect order so the caller can disconnect
    /// them natively.
    pub fn disconnect_all<T, S>(&self, store: &S) -> Vec<SignalId>
    where
        S: CallbackStore<T> + ?Sized,
    {
        let drained: Vec<(SignalId, Option<T>)> = {
            let mut links = self.lock();
            links.by_handle.clear();
            links
                .by_signal
                .drain(..)
                .map(|(signal, handle)| (signal, store.get_and_delete(handle)))
                .collect()
        };
        drained.into_iter().map(|(signal, _)| signal).collect()
    }

    /// Handle connected to `signal`, if any.
    pub fn handle_for(&self, signal: SignalId) -> Option<Handle> {
        self.lock().by_signal.get(&signal).copied()
    }

    /// Signal connected through `handle`, if any.
    pub fn signal_for(&self, handle: Handle) -> Option<SignalId> {
        self.lock().by_handle.get(&handle).copied()
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.lock().by_signal.len()
    }

    /// Whether no connection is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
