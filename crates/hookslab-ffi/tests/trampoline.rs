//! The exported trampolines driven by a fake native event source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hookslab_ffi::{
    callbacks, connect_signal, connected_signals, disconnect_signal, hookslab_destroy_notify,
    hookslab_invoke, hookslab_invoke_once, register, register_once, HookStatus,
};
use hookslab_test_utils::{CallCounter, MockEventSource};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

#[test]
fn emitted_signals_reach_their_closures() {
    let _serial = serial();
    let src = MockEventSource::new();
    let connect = |t, ud, d| src.connect(t, ud, Some(d));
    let a = connect_signal(|arg| arg as i32 + 1, connect).unwrap();
    let b = connect_signal(|arg| arg as i32 * 10, connect).unwrap();

    let emissions = src.emit(4);
    assert_eq!(emissions.len(), 2);
    assert_eq!(emissions[0].signal, Some(a));
    assert_eq!((emissions[0].status, emissions[0].result), (0, 5));
    assert_eq!(emissions[1].signal, Some(b));
    assert_eq!((emissions[1].status, emissions[1].result), (0, 40));

    assert_eq!(src.destroy_all(), 2);
    assert!(!disconnect_signal(a));
    assert!(!disconnect_signal(b));
}

#[test]
fn native_disconnect_runs_destroy_notify() {
    let _serial = serial();
    let src = MockEventSource::new();
    let live = callbacks().live();
    let linked = connected_signals();

    let signal = connect_signal(|_| 1, |t, ud, d| src.connect(t, ud, Some(d))).unwrap();
    assert_eq!(callbacks().live(), live + 1);
    assert_eq!(connected_signals(), linked + 1);

    assert!(src.disconnect(signal));
    assert_eq!(callbacks().live(), live);
    assert_eq!(connected_signals(), linked);
    assert!(src.emit(0).is_empty());
}

#[test]
fn disconnect_without_destroy_notify() {
    let _serial = serial();
    let src = MockEventSource::new();
    let live = callbacks().live();
    // A toolkit with no destroy-notify slot.
    let signal = connect_signal(|_| 1, |t, ud, _| src.connect(t, ud, None)).unwrap();

    assert!(src.disconnect(signal));
    assert_eq!(callbacks().live(), live + 1);
    assert!(disconnect_signal(signal));
    assert_eq!(callbacks().live(), live);
}

#[test]
fn idle_callbacks_run_once_and_release() {
    let _serial = serial();
    let src = MockEventSource::new();
    let counter = CallCounter::new();
    let live = callbacks().live();

    for _ in 0..3 {
        let counter = counter.clone();
        let ud = register_once(move |_| counter.hit() as i32);
        src.idle_add(hookslab_invoke_once, ud);
    }
    let ran = src.run_idle();
    assert_eq!(ran.len(), 3);
    assert!(ran.iter().all(|e| e.status == HookStatus::Ok as i32));
    assert_eq!(counter.calls(), 3);
    assert_eq!(callbacks().live(), live);
}

#[test]
fn idle_callback_may_queue_another() {
    let _serial = serial();
    let src = Arc::new(MockEventSource::new());
    let counter = CallCounter::new();

    let ud = register_once({
        let src = Arc::clone(&src);
        let counter = counter.clone();
        move |_| {
            counter.hit();
            let counter = counter.clone();
            let next = register_once(move |_| counter.hit() as i32);
            src.idle_add(hookslab_invoke_once, next);
            0
        }
    });
    src.idle_add(hookslab_invoke_once, ud);

    assert_eq!(src.run_idle().len(), 2);
    assert_eq!(counter.calls(), 2);
}

#[test]
fn stale_one_shot_fire_is_rejected() {
    let _serial = serial();
    let src = MockEventSource::new();
    let ud = register_once(|_| 9);

    assert_eq!(src.fire(hookslab_invoke_once, ud, 0).result, 9);
    let stale = src.fire(hookslab_invoke_once, ud, 0);
    assert_eq!(stale.status, HookStatus::InvalidHandle as i32);
    assert_eq!(stale.result, 0);
}

#[test]
fn recurring_handler_fires_from_many_threads() {
    let _serial = serial();
    let src = MockEventSource::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let signal = connect_signal(
        {
            let hits = Arc::clone(&hits);
            move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
                0
            }
        },
        |t, ud, d| src.connect(t, ud, Some(d)),
    )
    .unwrap();

    let emissions = src.emit_from_threads(8, 0);
    assert_eq!(emissions.len(), 8);
    assert!(emissions.iter().all(|e| e.signal == Some(signal) && e.status == 0));
    assert_eq!(hits.load(Ordering::SeqCst), 8);
    src.destroy_all();
}

#[test]
fn panicking_handler_does_not_unwind_into_the_source() {
    let _serial = serial();
    let src = MockEventSource::new();
    let ud = register(|_| panic!("handler failed"));

    let e = src.fire(hookslab_invoke, ud, 0);
    assert_eq!(e.status, HookStatus::Panicked as i32);
    hookslab_destroy_notify(ud);
}
