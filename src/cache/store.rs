//! Shared ephemeral cache client.
//!
//! The attribute and stat caches talk to a key/value store that offers only
//! single-key atomicity and per-key TTL expiry. [`MemoryCache`] is the
//! in-process implementation; anything exposing the same contract (a
//! memcached client, for instance) can be injected instead.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use thiserror::Error;
use tracing::warn;

use super::clock::Clock;

const SOURCE: &str = "cache::store";

#[derive(Debug, Error)]
pub enum CacheClientError {
    #[error("shared cache unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SharedCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheClientError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheClientError>;

    async fn remove(&self, key: &str) -> Result<(), CacheClientError>;
}

struct StoredValue {
    value: String,
    expires_at: u64,
}

/// In-process shared cache with LRU eviction and per-entry expiry.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, StoredValue>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(capacity: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            clock,
        }
    }

    /// Number of stored entries, including ones that expired but were not yet touched.
    pub fn len(&self) -> usize {
        self.lock("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock("clear").clear();
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, LruCache<String, StoredValue>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    target_module = SOURCE,
                    result = "poisoned_recovered",
                    "Recovered from poisoned shared cache lock"
                );
                poisoned.into_inner()
            }
        }
    }
}

#[async_trait]
impl SharedCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheClientError> {
        let now = self.clock.now_millis();
        let mut entries = self.lock("get");
        let expired = match entries.get(key) {
            Some(stored) if stored.expires_at > now => return Ok(Some(stored.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheClientError> {
        let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let expires_at = self.clock.now_millis().saturating_add(ttl_millis);
        self.lock("set")
            .put(key.to_string(), StoredValue { value, expires_at });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheClientError> {
        self.lock("remove").pop(key);
        Ok(())
    }
}
