//! Registry configuration and validation.

use hookslab_core::ConfigError;

/// Construction parameters for a [`ShardedRegistry`](crate::ShardedRegistry).
///
/// A plain [`Registry`](crate::Registry) needs no configuration; this only
/// matters once lock contention shows up under profiling and the table is
/// split into shards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Number of independently locked shards. Default: 1.
    ///
    /// With one shard, handles are identical to those of a plain `Registry`.
    pub shard_count: usize,
    /// Slots reserved up front in each shard. Default: 0.
    pub initial_capacity: usize,
}

impl RegistryConfig {
    /// Largest accepted `shard_count`.
    pub const MAX_SHARDS: usize = 64;

    /// Largest accepted `initial_capacity`.
    pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

    /// Single-shard configuration with no preallocation.
    pub fn new() -> Self {
        Self {
            shard_count: 1,
            initial_capacity: 0,
        }
    }

    /// One shard per available hardware thread, clamped to
    /// `[1, MAX_SHARDS]`.
    pub fn auto_sharded() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            shard_count: cpus.clamp(1, Self::MAX_SHARDS),
            ..Self::new()
        }
    }

    /// Check structural limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shard_count == 0 {
            return Err(ConfigError::ZeroShards);
        }
        if self.shard_count > Self::MAX_SHARDS {
            return Err(ConfigError::TooManyShards {
                configured: self.shard_count,
                max: Self::MAX_SHARDS,
            });
        }
        if self.initial_capacity > Self::MAX_INITIAL_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                configured: self.initial_capacity,
                max: Self::MAX_INITIAL_CAPACITY,
            });
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
