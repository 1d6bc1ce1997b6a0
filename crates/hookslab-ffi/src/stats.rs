//! Registry statistics and teardown for C callers.

use hookslab_registry::RegistryMetrics;

use crate::callback::callbacks;
use crate::signal::signals;
use crate::status::HookStatus;

/// C-compatible snapshot of the process-wide callback registry.
///
/// Fixed-width `u64` fields for ABI portability.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HookRegistryStats {
    /// Slots ever allocated (live + free).
    pub slots: u64,
    /// Callbacks currently registered.
    pub live: u64,
    /// Slots waiting to be reissued.
    pub free: u64,
    /// Cumulative number of registrations.
    pub assigned_total: u64,
    /// Cumulative number of releases.
    pub released_total: u64,
    /// Cumulative number of releases of dead handles.
    pub vacant_releases: u64,
    /// Signal connections currently tracked.
    pub signals: u64,
}

impl HookRegistryStats {
    fn snapshot() -> Self {
        let m: RegistryMetrics = callbacks().metrics();
        Self {
            slots: m.slots as u64,
            live: m.live as u64,
            free: m.free as u64,
            assigned_total: m.assigned_total,
            released_total: m.released_total,
            vacant_releases: m.vacant_releases,
            signals: signals().len() as u64,
        }
    }
}

/// Write the current registry statistics to `out`.
///
/// Returns `InvalidArgument` if `out` is null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hookslab_registry_stats(out: *mut HookRegistryStats) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return HookStatus::InvalidArgument as i32;
        }
        let stats = HookRegistryStats::snapshot();
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = stats };
        HookStatus::Ok as i32
    })
}

/// Release every registered callback and forget every signal link.
///
/// Call once all native sources are disconnected, typically at library
/// unload. Returns the number of callbacks dropped, or 0 if the teardown
/// panicked. Handles issued earlier resolve to nothing afterwards until
/// their slots are reissued.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hookslab_shutdown() -> u64 {
    ffi_guard_or!(0, {
        let linked = signals().disconnect_all(callbacks()).len();
        let rest = callbacks().drain();
        if !rest.is_empty() {
            tracing::warn!(
                count = rest.len(),
                "callbacks still registered at shutdown"
            );
        }
        for (handle, callback) in &rest {
            tracing::debug!(
                %handle,
                registered_at = %callback.registered_at(),
                "dropping unreleased callback"
            );
        }
        (linked + rest.len()) as u64
    })
}
