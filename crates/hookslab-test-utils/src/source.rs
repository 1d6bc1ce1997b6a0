//! A stand-in for a native toolkit's callback machinery.
//!
//! [`MockEventSource`] keeps connections as a C library would: a function
//! pointer plus an opaque user-data word, optionally with a destroy-notify
//! that runs when the connection goes away. Connections are fired outside
//! the source's own lock so callbacks may connect or disconnect reentrantly.

use std::collections::VecDeque;
use std::ffi::c_void;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_channel::unbounded;
use hookslab_core::SignalId;
use indexmap::IndexMap;

/// Native-side trampoline: `(user_data, arg, result_out) -> status`.
pub type Trampoline = extern "C" fn(*mut c_void, usize, *mut i32) -> i32;

/// Native destroy-notify: runs once when a connection is torn down.
pub type DestroyNotify = extern "C" fn(*mut c_void);

#[derive(Clone, Copy)]
struct Connection {
    trampoline: Trampoline,
    /// Stored as an address so the source is `Send`; the toolkit never
    /// dereferences it either.
    user_data: usize,
    destroy: Option<DestroyNotify>,
}

impl Connection {
    fn fire(&self, signal: Option<SignalId>, arg: usize) -> Emission {
        let mut result = 0i32;
        let status = (self.trampoline)(
            std::ptr::without_provenance_mut(self.user_data),
            arg,
            &mut result,
        );
        Emission {
            signal,
            status,
            result,
        }
    }

    fn destroy(&self) {
        if let Some(notify) = self.destroy {
            notify(std::ptr::without_provenance_mut(self.user_data));
        }
    }
}

/// Outcome of one trampoline call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Emission {
    /// Signal that fired, or `None` for idle sources and raw fires.
    pub signal: Option<SignalId>,
    /// Status code returned by the trampoline.
    pub status: i32,
    /// Value the trampoline wrote to its result slot.
    pub result: i32,
}

#[derive(Default)]
struct SourceState {
    next_signal: u64,
    signals: IndexMap<SignalId, Connection>,
    idle: VecDeque<Connection>,
}

/// Fake native event source.
#[derive(Default)]
pub struct MockEventSource {
    state: Mutex<SourceState>,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SourceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Connect a recurring handler and return its signal id. Ids start at 1,
    /// like GLib handler ids.
    pub fn connect(
        &self,
        trampoline: Trampoline,
        user_data: *mut c_void,
        destroy: Option<DestroyNotify>,
    ) -> SignalId {
        let mut state = self.lock();
        state.next_signal += 1;
        let signal = SignalId(state.next_signal);
        state.signals.insert(
            signal,
            Connection {
                trampoline,
                user_data: user_data.addr(),
                destroy,
            },
        );
        signal
    }

    /// Remove a handler, running its destroy-notify. Returns `false` for
    /// unknown ids.
    pub fn disconnect(&self, signal: SignalId) -> bool {
        let removed = self.lock().signals.shift_remove(&signal);
        match removed {
            Some(conn) => {
                conn.destroy();
                true
            }
            None => false,
        }
    }

    /// Remove every handler, running destroy-notifies in connect order.
    /// Mirrors what a toolkit does when the emitting object is finalized.
    pub fn destroy_all(&self) -> usize {
        let conns: Vec<Connection> = self
            .lock()
            .signals
            .drain(..)
            .map(|(_, conn)| conn)
            .collect();
        for conn in &conns {
            conn.destroy();
        }
        conns.len()
    }

    /// Number of connected handlers.
    pub fn handler_count(&self) -> usize {
        self.lock().signals.len()
    }

    fn snapshot(&self) -> Vec<(SignalId, Connection)> {
        self.lock()
            .signals
            .iter()
            .map(|(s, c)| (*s, *c))
            .collect()
    }

    /// Fire every handler once on the calling thread, in connect order.
    pub fn emit(&self, arg: usize) -> Vec<Emission> {
        self.snapshot()
            .into_iter()
            .map(|(signal, conn)| conn.fire(Some(signal), arg))
            .collect()
    }

    /// Fire every handler once from each of `threads` worker threads.
    ///
    /// Emissions arrive in completion order.
    pub fn emit_from_threads(&self, threads: usize, arg: usize) -> Vec<Emission> {
        let conns = self.snapshot();
        let (tx, rx) = unbounded();
        std::thread::scope(|scope| {
            for _ in 0..threads {
                let tx = tx.clone();
                let conns = &conns;
                scope.spawn(move || {
                    for (signal, conn) in conns {
                        // Receiver outlives the scope; send cannot fail.
                        let _ = tx.send(conn.fire(Some(*signal), arg));
                    }
                });
            }
        });
        drop(tx);
        rx.into_iter().collect()
    }

    /// Queue a one-shot idle callback.
    pub fn idle_add(&self, trampoline: Trampoline, user_data: *mut c_void) {
        self.lock().idle.push_back(Connection {
            trampoline,
            user_data: user_data.addr(),
            destroy: None,
        });
    }

    /// Number of queued idle callbacks.
    pub fn pending_idle(&self) -> usize {
        self.lock().idle.len()
    }

    /// Run and discard every queued idle callback, including ones queued
    /// by the callbacks themselves.
    pub fn run_idle(&self) -> Vec<Emission> {
        let mut out = Vec::new();
        loop {
            let next = self.lock().idle.pop_front();
            match next {
                Some(conn) => out.push(conn.fire(None, 0)),
                None => return out,
            }
        }
    }

    /// Fire an arbitrary `(trampoline, user_data)` pair once, the way a
    /// misbehaving or racing toolkit might.
    pub fn fire(&self, trampoline: Trampoline, user_data: *mut c_void, arg: usize) -> Emission {
        Connection {
            trampoline,
            user_data: user_data.addr(),
            destroy: None,
        }
        .fire(None, arg)
    }
}
