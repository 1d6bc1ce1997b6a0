//! Recurring signal connections.
//!
//! [`connect_signal`] registers a closure, hands the native connect call the
//! recurring trampoline, and records which signal id owns which handle. The
//! connection can then be torn down from either end: by signal id through
//! [`disconnect_signal`], or by the toolkit running
//! [`hookslab_destroy_notify`](crate::hookslab_destroy_notify).

use std::ffi::c_void;
use std::sync::LazyLock;

use hookslab_core::SignalId;
use hookslab_registry::SignalTable;

use crate::callback::{
    callbacks, hookslab_destroy_notify, hookslab_invoke, Callback, DestroyNotify, Trampoline,
};
use crate::status::HookStatus;

static SIGNALS: LazyLock<SignalTable> = LazyLock::new(SignalTable::new);

pub(crate) fn signals() -> &'static SignalTable {
    &SIGNALS
}

/// Register `f` and connect it through `connect`.
///
/// `connect` receives the trampoline, user data and destroy-notify to pass
/// to the native connect function, and returns the handler id it got back.
/// An id of 0 means the native side refused the connection; the callback
/// is released and `None` is returned.
///
/// If the toolkit runs the destroy-notify before `connect` returns, the
/// slot may already hold someone else's callback. The signal is then left
/// untracked and `None` is returned.
#[track_caller]
pub fn connect_signal<F, C>(f: F, connect: C) -> Option<SignalId>
where
    F: Fn(usize) -> i32 + Send + Sync + 'static,
    C: FnOnce(Trampoline, *mut c_void, DestroyNotify) -> SignalId,
{
    let ours = Callback::new(f);
    let handle = callbacks().assign(ours.clone());
    let signal = connect(hookslab_invoke, handle.into_user_data(), hookslab_destroy_notify);
    let still_ours = || {
        callbacks()
            .with(handle, |current| current.same_closure(&ours))
            .unwrap_or(false)
    };

    if signal.0 == 0 {
        tracing::debug!(%handle, "native connect refused, releasing callback");
        let (_, released) = signals().forget_handle_with(handle, || {
            if still_ours() {
                callbacks().get_and_delete(handle)
            } else {
                None
            }
        });
        drop(released);
        return None;
    }
    if !signals().register_if(signal, handle, still_ours) {
        tracing::debug!(%signal, %handle, "callback released during native connect");
        return None;
    }
    tracing::trace!(%signal, %handle, "signal connected");
    Some(signal)
}

/// Forget `signal` and release its callback.
///
/// Call after disconnecting natively when the toolkit has no destroy-notify
/// for the connection. Returns `false` for unknown or already released
/// signals.
pub fn disconnect_signal(signal: SignalId) -> bool {
    signals().disconnect(signal, callbacks())
}

/// C entry point for [`disconnect_signal`].
///
/// Returns `InvalidHandle` if `signal_id` is not connected.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hookslab_disconnect_signal(signal_id: u64) -> i32 {
    ffi_guard!({
        if disconnect_signal(SignalId(signal_id)) {
            HookStatus::Ok as i32
        } else {
            HookStatus::InvalidHandle as i32
        }
    })
}

/// Number of tracked signal connections.
pub fn connected_signals() -> usize {
    signals().len()
}
