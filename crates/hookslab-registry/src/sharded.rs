//! [`ShardedRegistry`]: the registry split across independently locked shards.
//!
//! Handles stay dense per shard and are interleaved across shards:
//! `handle = local * shard_count + shard`. Decoding is a division and a
//! remainder, so lookups and releases touch exactly one lock. `assign`
//! may visit every shard for a free slot before growing one.

use std::sync::atomic::{AtomicUsize, Ordering};

use hookslab_core::{CallbackStore, ConfigError, Handle, RegistryError};

use crate::config::RegistryConfig;
use crate::metrics::RegistryMetrics;
use crate::registry::Registry;

/// A [`Registry`] partitioned by handle into `shard_count` shards.
///
/// Exposes the same four-operation contract. `assign` distributes payloads
/// round-robin but prefers any shard with a free slot; lookups and releases
/// go straight to the owning shard.
#[derive(Debug)]
pub struct ShardedRegistry<T> {
    shards: Box<[Registry<T>]>,
    cursor: AtomicUsize,
}

impl<T> ShardedRegistry<T> {
    /// Build a sharded registry from a validated config.
    pub fn new(config: &RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shards = (0..config.shard_count)
            .map(|_| Registry::with_capacity(config.initial_capacity))
            .collect();
        tracing::debug!(
            shards = config.shard_count,
            capacity = config.initial_capacity,
            "sharded callback registry created"
        );
        Ok(Self {
            shards,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn encode(&self, shard: usize, local: Handle) -> Handle {
        Handle(local.0 * self.shards.len() + shard)
    }

    fn locate(&self, handle: Handle) -> (&Registry<T>, Handle) {
        let n = self.shards.len();
        (&self.shards[handle.0 % n], Handle(handle.0 / n))
    }

    /// Store a payload and return its global handle.
    ///
    /// Freed slots are reused before any shard grows: shards are tried
    /// round-robin from the cursor, and only when none has a free slot does
    /// the shard at the cursor append one.
    pub fn assign(&self, payload: T) -> Handle {
        let n = self.shards.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % n;
        let mut payload = payload;
        for offset in 0..n {
            let shard = (start + offset) % n;
            match self.shards[shard].assign_if_free(payload) {
                Ok(local) => return self.encode(shard, local),
                Err(back) => payload = back,
            }
        }
        let local = self.shards[start].assign(payload);
        self.encode(start, local)
    }

    /// Clone the payload behind `handle` out of its shard.
    pub fn get(&self, handle: Handle) -> Option<T>
    where
        T: Clone,
    {
        let (shard, local) = self.locate(handle);
        shard.get(local)
    }

    /// Run `f` on the payload behind `handle` under its shard's read lock.
    pub fn with<R>(&self, handle: Handle, f: impl FnOnce(&T) -> R) -> Option<R> {
        let (shard, local) = self.locate(handle);
        shard.with(local, f)
    }

    /// Whether `handle` currently names a payload.
    pub fn contains(&self, handle: Handle) -> bool {
        let (shard, local) = self.locate(handle);
        shard.contains(local)
    }

    /// Release `handle`, dropping its payload. Dead handles are ignored.
    pub fn delete(&self, handle: Handle) {
        drop(self.get_and_delete(handle));
    }

    /// Release `handle` and return its payload.
    pub fn get_and_delete(&self, handle: Handle) -> Option<T> {
        let (shard, local) = self.locate(handle);
        shard.get_and_delete(local)
    }

    /// Release `handle`, reporting dead handles as errors.
    ///
    /// Errors carry the global handle, not the shard-local one.
    pub fn try_get_and_delete(&self, handle: Handle) -> Result<T, RegistryError> {
        let (shard, local) = self.locate(handle);
        shard.try_get_and_delete(local).map_err(|err| match err {
            RegistryError::UnknownHandle { slots, .. } => {
                RegistryError::UnknownHandle { handle, slots }
            }
            RegistryError::Vacant { .. } => RegistryError::Vacant { handle },
        })
    }

    /// Release every live handle across all shards, in global handle order.
    pub fn drain(&self) -> Vec<(Handle, T)> {
        let mut out: Vec<(Handle, T)> = self
            .shards
            .iter()
            .enumerate()
            .flat_map(|(shard, reg)| {
                reg.drain()
                    .into_iter()
                    .map(move |(local, payload)| (local, shard, payload))
            })
            .map(|(local, shard, payload)| (self.encode(shard, local), payload))
            .collect();
        out.sort_by_key(|(handle, _)| *handle);
        out
    }

    /// Number of live handles across all shards.
    pub fn live(&self) -> usize {
        self.shards.iter().map(Registry::live).sum()
    }

    /// Whether no handle is live in any shard.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(Registry::is_empty)
    }

    /// Summed metrics of every shard.
    pub fn metrics(&self) -> RegistryMetrics {
        let mut total = RegistryMetrics::default();
        for shard in self.shards.iter() {
            total += &shard.metrics();
        }
        total
    }
}

impl<T: Send + Sync> CallbackStore<T> for ShardedRegistry<T> {
    fn assign(&self, payload: T) -> Handle {
        ShardedRegistry::assign(self, payload)
    }

    fn get(&self, handle: Handle) -> Option<T>
    where
        T: Clone,
    {
        ShardedRegistry::get(self, handle)
    }

    fn delete(&self, handle: Handle) {
        ShardedRegistry::delete(self, handle)
    }

    fn get_and_delete(&self, handle: Handle) -> Option<T> {
        ShardedRegistry::get_and_delete(self, handle)
    }
}
