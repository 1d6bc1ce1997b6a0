//! Error types for the hookslab registry.
//!
//! Ordinary registry operations never fail: lookups return `None` and
//! releases of dead handles are no-ops. These types exist for the strict
//! entry points that want a reported programming error instead, and for
//! configuration validation.

use std::error::Error;
use std::fmt;

use crate::handle::Handle;

/// A handle could not be resolved or released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The handle indexes past the end of the slot table; it was never
    /// issued by this registry.
    UnknownHandle {
        /// The rejected handle.
        handle: Handle,
        /// Slot count of the table at the time of the call.
        slots: usize,
    },
    /// The handle addresses a slot that is currently free (already
    /// released, or a double free).
    Vacant {
        /// The rejected handle.
        handle: Handle,
    },
}

impl RegistryError {
    /// The handle that caused the error.
    pub fn handle(&self) -> Handle {
        match self {
            Self::UnknownHandle { handle, .. } | Self::Vacant { handle } => *handle,
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHandle { handle, slots } => {
                write!(f, "unknown handle {handle}: table has {slots} slots")
            }
            Self::Vacant { handle } => write!(f, "handle {handle} is not occupied"),
        }
    }
}

impl Error for RegistryError {}

/// Errors detected by `RegistryConfig::validate()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `shard_count` is zero.
    ZeroShards,
    /// `shard_count` exceeds the supported maximum.
    TooManyShards {
        /// The configured shard count.
        configured: usize,
        /// The largest accepted shard count.
        max: usize,
    },
    /// `initial_capacity` exceeds the supported maximum.
    CapacityTooLarge {
        /// The configured per-shard capacity.
        configured: usize,
        /// The largest accepted capacity.
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroShards => write!(f, "shard_count must be at least 1"),
            Self::TooManyShards { configured, max } => {
                write!(f, "shard_count {configured} exceeds maximum {max}")
            }
            Self::CapacityTooLarge { configured, max } => {
                write!(f, "initial_capacity {configured} exceeds maximum {max}")
            }
        }
    }
}

impl Error for ConfigError {}
