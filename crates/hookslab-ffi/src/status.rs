//! C-compatible status codes.
//!
//! [`HookStatus`] is a `repr(i32)` enum returned by every exported
//! function that can fail. `Ok` is zero and every error is negative.

use hookslab_core::RegistryError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookStatus {
    /// Success.
    Ok = 0,
    /// Handle is unknown or its callback was already released.
    InvalidHandle = -1,
    /// An argument is null or otherwise invalid.
    InvalidArgument = -2,
    /// A Rust panic was caught at the FFI boundary, either in the registry
    /// or in the callback itself.
    Panicked = -128,
}

impl HookStatus {
    /// Whether this is [`HookStatus::Ok`].
    pub fn is_ok(self) -> bool {
        self == HookStatus::Ok
    }
}

impl From<&RegistryError> for HookStatus {
    fn from(e: &RegistryError) -> Self {
        match e {
            RegistryError::UnknownHandle { .. } | RegistryError::Vacant { .. } => {
                HookStatus::InvalidHandle
            }
        }
    }
}
