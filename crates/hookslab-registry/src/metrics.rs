//! Occupancy and lifetime counters for a registry.
//!
//! [`RegistryMetrics`] is a snapshot: occupancy comes from the slab at the
//! moment of the call, the totals are cumulative since construction.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of registry occupancy and cumulative traffic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryMetrics {
    /// Slots ever allocated (live + free).
    pub slots: usize,
    /// Handles currently live.
    pub live: usize,
    /// Slots waiting on the free list.
    pub free: usize,
    /// Cumulative number of `assign` calls.
    pub assigned_total: u64,
    /// Cumulative number of handles released.
    pub released_total: u64,
    /// Cumulative number of releases of unknown or already-free handles.
    pub vacant_releases: u64,
}

impl RegistryMetrics {
    /// Handles issued but never released. Non-zero at teardown means some
    /// native source was never disconnected.
    pub fn outstanding(&self) -> u64 {
        self.assigned_total.saturating_sub(self.released_total)
    }
}

impl AddAssign<&RegistryMetrics> for RegistryMetrics {
    fn add_assign(&mut self, rhs: &RegistryMetrics) {
        self.slots += rhs.slots;
        self.live += rhs.live;
        self.free += rhs.free;
        self.assigned_total += rhs.assigned_total;
        self.released_total += rhs.released_total;
        self.vacant_releases += rhs.vacant_releases;
    }
}

/// Lock-free cumulative counters owned by a registry.
#[derive(Debug)]
pub(crate) struct Counters {
    pub(crate) assigned: AtomicU64,
    pub(crate) released: AtomicU64,
    pub(crate) vacant: AtomicU64,
}

impl Counters {
    pub(crate) const fn new() -> Self {
        Self {
            assigned: AtomicU64::new(0),
            released: AtomicU64::new(0),
            vacant: AtomicU64::new(0),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub(crate) fn load(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}
