//! The process-wide callback registry and its trampolines.
//!
//! A binding layer registers a Rust closure with [`register`] (recurring)
//! or [`register_once`] (one-shot), then hands the native toolkit the
//! matching trampoline together with the returned user-data pointer:
//!
//! | native slot     | recurring                   | one-shot               |
//! |-----------------|-----------------------------|------------------------|
//! | function        | [`hookslab_invoke`]         | [`hookslab_invoke_once`] |
//! | destroy-notify  | [`hookslab_destroy_notify`] | none                   |
//!
//! Trampolines clone the closure out of the registry and call it with the
//! registry unlocked, so a callback may register or release callbacks.

use std::any::Any;
use std::ffi::c_void;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use std::sync::{Arc, Mutex, PoisonError};

use hookslab_core::Handle;
use hookslab_registry::Registry;

use crate::signal;
use crate::status::HookStatus;

/// Trampoline signature: `(user_data, arg, result_out) -> status`.
pub type Trampoline = extern "C" fn(*mut c_void, usize, *mut i32) -> i32;

/// Destroy-notify signature, as in `GDestroyNotify`.
pub type DestroyNotify = extern "C" fn(*mut c_void);

static CALLBACKS: Registry<Callback> = Registry::new();

/// The registry behind every trampoline.
pub fn callbacks() -> &'static Registry<Callback> {
    &CALLBACKS
}

/// A registered closure and the place it was registered from.
#[derive(Clone)]
pub struct Callback {
    func: Arc<dyn Fn(usize) -> i32 + Send + Sync>,
    registered_at: &'static Location<'static>,
}

impl Callback {
    /// Wrap `f`, recording the caller's source location.
    #[track_caller]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(usize) -> i32 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(f),
            registered_at: Location::caller(),
        }
    }

    /// Where this callback was registered.
    pub fn registered_at(&self) -> &'static Location<'static> {
        self.registered_at
    }

    /// Whether `self` and `other` wrap the same closure allocation.
    pub fn same_closure(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    /// Call the closure, catching a panic.
    ///
    /// A panic is logged with the registration site and reported as
    /// [`HookStatus::Panicked`].
    pub fn invoke(&self, handle: Handle, arg: usize) -> Result<i32, HookStatus> {
        catch_unwind(AssertUnwindSafe(|| (self.func)(arg))).map_err(|payload| {
            tracing::error!(
                %handle,
                registered_at = %self.registered_at,
                panic = panic_message(payload.as_ref()),
                "callback panicked"
            );
            HookStatus::Panicked
        })
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("registered_at", &self.registered_at)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// Register a recurring callback and return its user-data pointer.
///
/// Pair it with [`hookslab_invoke`] and [`hookslab_destroy_notify`].
#[track_caller]
pub fn register<F>(f: F) -> *mut c_void
where
    F: Fn(usize) -> i32 + Send + Sync + 'static,
{
    CALLBACKS.assign(Callback::new(f)).into_user_data()
}

/// Register a one-shot callback and return its user-data pointer.
///
/// Pair it with [`hookslab_invoke_once`], which releases the handle before
/// calling `f`. If the handle is instead fired through
/// [`hookslab_invoke`], `f` still runs at most once and later calls
/// return 0.
#[track_caller]
pub fn register_once<F>(f: F) -> *mut c_void
where
    F: FnOnce(usize) -> i32 + Send + 'static,
{
    let cell = Mutex::new(Some(f));
    let callback = Callback::new(move |arg| {
        let f = cell.lock().unwrap_or_else(PoisonError::into_inner).take();
        f.map_or(0, |f| f(arg))
    });
    CALLBACKS.assign(callback).into_user_data()
}

#[allow(unsafe_code)]
fn deliver(callback: &Callback, handle: Handle, arg: usize, result_out: *mut i32) -> i32 {
    match callback.invoke(handle, arg) {
        Ok(value) => {
            if !result_out.is_null() {
                // SAFETY: a non-null result_out points to a writable i32 per
                // caller contract.
                unsafe { *result_out = value };
            }
            HookStatus::Ok as i32
        }
        Err(status) => status as i32,
    }
}

/// Recurring trampoline: run the callback behind `user_data`.
///
/// Writes the callback's return value to `result_out` (which may be null).
/// Returns `InvalidHandle` if the callback was already released.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hookslab_invoke(
    user_data: *mut c_void,
    arg: usize,
    result_out: *mut i32,
) -> i32 {
    ffi_guard!({
        let handle = Handle::from_user_data(user_data);
        match CALLBACKS.get(handle) {
            Some(callback) => deliver(&callback, handle, arg, result_out),
            None => HookStatus::InvalidHandle as i32,
        }
    })
}

/// One-shot trampoline: release the handle, then run its callback.
///
/// Of several racing calls on the same handle exactly one runs the
/// callback; the rest return `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hookslab_invoke_once(
    user_data: *mut c_void,
    arg: usize,
    result_out: *mut i32,
) -> i32 {
    ffi_guard!({
        let handle = Handle::from_user_data(user_data);
        match CALLBACKS.get_and_delete(handle) {
            Some(callback) => deliver(&callback, handle, arg, result_out),
            None => HookStatus::InvalidHandle as i32,
        }
    })
}

/// Destroy-notify: release the callback behind `user_data`.
///
/// Also forgets the signal connection the handle belonged to, if any.
/// Dead handles are ignored.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hookslab_destroy_notify(user_data: *mut c_void) {
    ffi_guard_or!((), {
        let handle = Handle::from_user_data(user_data);
        // Unlink and free under the signal table lock, so a reissued slot
        // is never linked to this handle's signal.
        let (_, callback) =
            signal::signals().forget_handle_with(handle, || CALLBACKS.get_and_delete(handle));
        drop(callback);
    })
}

/// Strict release: like [`hookslab_destroy_notify`] but reports a dead
/// handle as `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hookslab_release(user_data: *mut c_void) -> i32 {
    ffi_guard!({
        let handle = Handle::from_user_data(user_data);
        let (_, released) =
            signal::signals().forget_handle_with(handle, || CALLBACKS.try_get_and_delete(handle));
        match released {
            Ok(_) => HookStatus::Ok as i32,
            Err(e) => HookStatus::from(&e) as i32,
        }
    })
}
