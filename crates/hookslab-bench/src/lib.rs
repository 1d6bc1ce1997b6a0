//! Benchmark workloads for the hookslab callback registry.
//!
//! Provides deterministic operation streams so every store is measured on
//! the same traffic:
//!
//! - [`churn_workload`]: seeded mix of assign / get / release, the shape of
//!   a UI that keeps connecting and disconnecting handlers
//! - [`run_workload`]: replay a stream against any [`CallbackStore`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use hookslab_core::{CallbackStore, Handle};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a workload. Indices refer to the replay's live set, not to
/// handles, so the same stream is valid for every store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Register a new payload.
    Assign,
    /// Look up the n-th live handle (modulo the live count).
    Get(usize),
    /// Release the n-th live handle (modulo the live count).
    Release(usize),
}

/// Generate `len` operations from `seed`.
///
/// Assigns dominate while fewer than `target_live` handles are live, then
/// the mix settles around that size with lookups making up half the stream.
pub fn churn_workload(seed: u64, len: usize, target_live: usize) -> Vec<Op> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut live = 0usize;
    let mut ops = Vec::with_capacity(len);
    for _ in 0..len {
        let roll = rng.next_u32() % 4;
        let pick = rng.next_u64() as usize;
        let op = if live == 0 || (live < target_live && roll == 0) {
            Op::Assign
        } else {
            match roll {
                0 | 1 => Op::Get(pick),
                2 if live < target_live => Op::Assign,
                _ => Op::Release(pick),
            }
        };
        match op {
            Op::Assign => live += 1,
            Op::Release(_) => live -= 1,
            Op::Get(_) => {}
        }
        ops.push(op);
    }
    ops
}

/// Replay `ops` against `store`. Returns the sum of every payload read, so
/// the work cannot be optimised away.
pub fn run_workload<S: CallbackStore<u64> + ?Sized>(store: &S, ops: &[Op]) -> u64 {
    let mut live: Vec<Handle> = Vec::new();
    let mut sum = 0u64;
    for (i, op) in ops.iter().enumerate() {
        match *op {
            Op::Assign => live.push(store.assign(i as u64)),
            Op::Get(n) if !live.is_empty() => {
                sum += store.get(live[n % live.len()]).unwrap_or(0);
            }
            Op::Release(n) if !live.is_empty() => {
                let h = live.swap_remove(n % live.len());
                sum += store.get_and_delete(h).unwrap_or(0);
            }
            _ => {}
        }
    }
    for h in live {
        store.delete(h);
    }
    sum
}
