//! [`Registry`]: a reader-writer locked [`Slab`].

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hookslab_core::{CallbackStore, Handle, RegistryError};
use hookslab_slab::Slab;

use crate::metrics::{Counters, RegistryMetrics};

/// Thread-safe map from [`Handle`] tokens to callback payloads.
///
/// Lookups take the shared lock; `assign` and the release operations take
/// the exclusive lock. Each critical section is one slab call, so there is
/// no blocking inside the lock and no deadlock between registry operations.
///
/// The registry is an owned value. Create it when the binding subsystem
/// starts and drop it only after every native source holding one of its
/// handles has been disconnected; a trampoline firing after that point
/// resolves to `None`, never to freed memory.
///
/// # Lock poisoning
///
/// A panic cannot interrupt a slab operation halfway (the only panic source
/// inside the lock is allocation failure), so a poisoned lock still guards
/// a consistent table and is recovered rather than propagated.
#[derive(Debug)]
pub struct Registry<T> {
    slab: RwLock<Slab<T>>,
    counters: Counters,
}

impl<T> Registry<T> {
    /// Create an empty registry. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            slab: RwLock::new(Slab::new()),
            counters: Counters::new(),
        }
    }

    /// Create an empty registry with `capacity` slots preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slab: RwLock::new(Slab::with_capacity(capacity)),
            counters: Counters::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Slab<T>> {
        self.slab.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slab<T>> {
        self.slab.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a payload and return the token for it.
    pub fn assign(&self, payload: T) -> Handle {
        let handle = {
            let mut slab = self.write();
            let handle = slab.put(payload);
            Counters::bump(&self.counters.assigned, 1);
            handle
        };
        tracing::trace!(%handle, "callback assigned");
        handle
    }

    /// Store `payload` only if a freed slot is waiting to be reused.
    ///
    /// Hands the payload back when the table would have to grow.
    pub fn assign_if_free(&self, payload: T) -> Result<Handle, T> {
        let handle = {
            let mut slab = self.write();
            if slab.free_count() == 0 {
                return Err(payload);
            }
            let handle = slab.put(payload);
            Counters::bump(&self.counters.assigned, 1);
            handle
        };
        tracing::trace!(%handle, "callback assigned to recycled slot");
        Ok(handle)
    }

    /// Clone the payload behind `handle` out of the table.
    ///
    /// The lock is released before this returns, so the caller may invoke
    /// the payload and have it re-enter the registry.
    pub fn get(&self, handle: Handle) -> Option<T>
    where
        T: Clone,
    {
        self.read().get(handle).cloned()
    }

    /// Run `f` on the payload behind `handle` while holding the shared lock.
    ///
    /// `f` must not call [`assign`](Self::assign) or any release operation on
    /// this registry; that would wait on the lock `f` is running under.
    pub fn with<R>(&self, handle: Handle, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.read().get(handle).map(f)
    }

    /// Whether `handle` currently names a payload.
    pub fn contains(&self, handle: Handle) -> bool {
        self.read().contains(handle)
    }

    /// Release `handle`, dropping its payload.
    ///
    /// Unknown and already-released handles are ignored (and logged). The
    /// payload is dropped after the lock is released.
    pub fn delete(&self, handle: Handle) {
        drop(self.get_and_delete(handle));
    }

    /// Release `handle` and return its payload.
    ///
    /// Of two concurrent calls on the same handle, exactly one receives the
    /// payload; the other gets `None`.
    pub fn get_and_delete(&self, handle: Handle) -> Option<T> {
        match self.try_get_and_delete(handle) {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::warn!(%handle, error = %err, "release of dead callback handle ignored");
                None
            }
        }
    }

    /// Release `handle`, reporting unknown and already-free handles as
    /// errors instead of logging them.
    pub fn try_get_and_delete(&self, handle: Handle) -> Result<T, RegistryError> {
        let released = {
            let mut slab = self.write();
            let released = slab.try_pop(handle);
            match released {
                Ok(_) => Counters::bump(&self.counters.released, 1),
                Err(_) => Counters::bump(&self.counters.vacant, 1),
            }
            released
        };
        if released.is_ok() {
            tracing::trace!(%handle, "callback released");
        }
        released
    }

    /// Release every live handle and return the payloads in handle order.
    ///
    /// Meant for subsystem teardown, after all native sources are gone.
    pub fn drain(&self) -> Vec<(Handle, T)> {
        let drained = {
            let mut slab = self.write();
            let drained = slab.drain();
            Counters::bump(&self.counters.released, drained.len() as u64);
            drained
        };
        if !drained.is_empty() {
            tracing::debug!(count = drained.len(), "callback registry drained");
        }
        drained
    }

    /// Total slots, live or free.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Number of live handles.
    pub fn live(&self) -> usize {
        self.read().live()
    }

    /// Whether no handle is live.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Occupancy and traffic snapshot.
    pub fn metrics(&self) -> RegistryMetrics {
        let stats = self.read().stats();
        RegistryMetrics {
            slots: stats.slots,
            live: stats.live,
            free: stats.free,
            assigned_total: Counters::load(&self.counters.assigned),
            released_total: Counters::load(&self.counters.released),
            vacant_releases: Counters::load(&self.counters.vacant),
        }
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> CallbackStore<T> for Registry<T> {
    fn assign(&self, payload: T) -> Handle {
        Registry::assign(self, payload)
    }

    fn get(&self, handle: Handle) -> Option<T>
    where
        T: Clone,
    {
        Registry::get(self, handle)
    }

    fn delete(&self, handle: Handle) {
        Registry::delete(self, handle)
    }

    fn get_and_delete(&self, handle: Handle) -> Option<T> {
        Registry::get_and_delete(self, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn round_trip() {
        let reg = Registry::new();
        let h = reg.assign("payload");
        assert_eq!(reg.get(h), Some("payload"));
        assert!(reg.contains(h));
    }

    #[test]
    fn single_delivery() {
        let reg = Registry::new();
        let h = reg.assign(7u32);
        assert_eq!(reg.get_and_delete(h), Some(7));
        assert_eq!(reg.get(h), None);
        assert_eq!(reg.get_and_delete(h), None);
    }

    #[test]
    fn reuse_scenario() {
        let reg = Registry::new();
        assert_eq!(reg.assign("A"), Handle(0));
        assert_eq!(reg.assign("B"), Handle(1));
        reg.delete(Handle(0));
        assert_eq!(reg.assign("C"), Handle(0));
        assert_eq!(reg.get(Handle(0)), Some("C"));
        assert_eq!(reg.get(Handle(1)), Some("B"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn freed_slot_recycled_before_growth() {
        let reg = Registry::new();
        let h = reg.assign(1);
        reg.delete(h);
        assert_eq!(reg.assign(2), h);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn assign_if_free_never_grows() {
        let reg = Registry::new();
        assert_eq!(reg.assign_if_free('a'), Err('a'));
        let h = reg.assign('b');
        reg.delete(h);
        assert_eq!(reg.assign_if_free('c'), Ok(h));
        assert_eq!(reg.assign_if_free('d'), Err('d'));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.metrics().assigned_total, 2);
    }

    #[test]
    fn unknown_handles_resolve_to_none() {
        let reg: Registry<u8> = Registry::new();
        assert_eq!(reg.get(Handle(0)), None);
        reg.assign(1);
        assert_eq!(reg.get(Handle(1)), None);
        assert_eq!(reg.get(Handle(usize::MAX)), None);
        assert_eq!(reg.with(Handle(usize::MAX), |v| *v), None);
    }

    #[test]
    fn double_delete_is_a_no_op() {
        let reg = Registry::new();
        let a = reg.assign('a');
        reg.delete(a);
        reg.delete(a);
        let x = reg.assign('x');
        let y = reg.assign('y');
        assert_ne!(x, y);
        assert_eq!(reg.get(x), Some('x'));
        assert_eq!(reg.get(y), Some('y'));
        assert_eq!(reg.metrics().vacant_releases, 1);
    }

    #[test]
    fn strict_release_reports_errors() {
        let reg = Registry::new();
        let h = reg.assign(1u8);
        assert_eq!(reg.try_get_and_delete(h), Ok(1));
        assert_eq!(
            reg.try_get_and_delete(h),
            Err(RegistryError::Vacant { handle: h })
        );
        assert_eq!(
            reg.try_get_and_delete(Handle(5)),
            Err(RegistryError::UnknownHandle {
                handle: Handle(5),
                slots: 1
            })
        );
    }

    #[test]
    fn with_borrows_without_clone() {
        let reg = Registry::new();
        let h = reg.assign(vec![1, 2, 3]);
        assert_eq!(reg.with(h, |v| v.len()), Some(3));
    }

    #[derive(Clone)]
    struct Cb(Arc<dyn Fn(&Registry<Cb>) -> Handle + Send + Sync>);

    #[test]
    fn callback_may_reenter_after_get() {
        let reg: Registry<Cb> = Registry::new();
        let h = reg.assign(Cb(Arc::new(|r: &Registry<Cb>| {
            r.assign(Cb(Arc::new(|_: &Registry<Cb>| Handle(0))))
        })));
        let cb = reg.get(h).unwrap();
        let inner = (cb.0)(&reg);
        assert_ne!(inner, h);
        assert!(reg.contains(inner));
    }

    #[test]
    fn payload_dropped_outside_lock() {
        struct Reentrant(Arc<Registry<Reentrant>>);
        impl Drop for Reentrant {
            fn drop(&mut self) {
                // Would deadlock if the write lock were still held.
                let _ = self.0.live();
            }
        }

        let reg = Arc::new(Registry::new());
        let h = reg.assign(Reentrant(Arc::clone(&reg)));
        reg.delete(h);
        assert!(reg.is_empty());
    }

    #[test]
    fn drain_releases_all() {
        let reg = Registry::new();
        let a = reg.assign("a");
        let b = reg.assign("b");
        assert_eq!(reg.drain(), vec![(a, "a"), (b, "b")]);
        assert!(reg.is_empty());
        let m = reg.metrics();
        assert_eq!(m.assigned_total, 2);
        assert_eq!(m.released_total, 2);
        assert_eq!(m.outstanding(), 0);
    }

    #[test]
    fn metrics_track_occupancy() {
        let reg = Registry::with_capacity(4);
        let a = reg.assign(());
        reg.assign(());
        reg.delete(a);
        let m = reg.metrics();
        assert_eq!((m.slots, m.live, m.free), (2, 1, 1));
        assert_eq!(m.assigned_total, 2);
        assert_eq!(m.released_total, 1);
    }

    #[test]
    fn static_registry() {
        static REG: Registry<&'static str> = Registry::new();
        let h = REG.assign("static");
        assert_eq!(REG.get_and_delete(h), Some("static"));
    }
}
