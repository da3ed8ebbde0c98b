//! Cache configuration.
//!
//! Controls the staleness window, the inline/long value split and the
//! capacity of the in-process shared cache. Built from the resolved
//! `[cache]` settings; the defaults here are the ones `hydra.toml` falls back to.

use std::num::NonZeroUsize;
use std::time::Duration;

pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_INLINE_VALUE_LIMIT: usize = 120;
pub const DEFAULT_CAPACITY: usize = 4096;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Window (ms) during which a cached entry is served without reloading.
    pub check_interval_ms: u64,
    /// Longest value (in characters) stored inline in the main entry.
    pub inline_value_limit: usize,
    /// Maximum entries held by the in-process shared cache.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            inline_value_limit: DEFAULT_INLINE_VALUE_LIMIT,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            check_interval_ms: settings.check_interval_ms,
            inline_value_limit: settings.inline_value_limit,
            capacity: settings.capacity,
        }
    }
}

impl CacheConfig {
    /// TTL applied to every shared-cache write.
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
