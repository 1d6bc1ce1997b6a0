//! Strongly-typed tokens: [`Handle`] and [`SignalId`].

use std::ffi::c_void;
use std::fmt;

/// Opaque token identifying a registry slot.
///
/// A `Handle` is the only thing that crosses the foreign-function boundary.
/// Native code stores it as callback "user data" and must hand back exactly
/// the value it received: no arithmetic, no fabrication, no double release.
///
/// The value is a dense slot index, not an address, so it stays valid no
/// matter where the payload it names lives in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Handle(pub usize);

impl Handle {
    /// Slot index carried by this handle.
    pub const fn index(self) -> usize {
        self.0
    }

    /// Encode the handle as a native user-data pointer.
    ///
    /// The pointer carries no provenance and must never be dereferenced;
    /// it exists only to be passed back through [`Handle::from_user_data`].
    pub fn into_user_data(self) -> *mut c_void {
        std::ptr::without_provenance_mut(self.0)
    }

    /// Decode a handle previously produced by [`Handle::into_user_data`].
    pub fn from_user_data(user_data: *const c_void) -> Self {
        Self(user_data.addr())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Handle {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<Handle> for usize {
    fn from(h: Handle) -> Self {
        h.0
    }
}

/// Native signal handler id, as returned by the toolkit's connect call.
///
/// Distinct from [`Handle`]: the toolkit allocates signal ids, the registry
/// allocates handles. A recurring signal connection owns one of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub u64);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SignalId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
