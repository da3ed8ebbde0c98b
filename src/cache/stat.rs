//! File-system metadata cache.
//!
//! Answers "is this a file or a directory" for routing, re-stating a path at
//! most once per staleness window.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};

use crate::application::store::BackingStore;
use crate::domain::path::ResourcePath;

use super::clock::Clock;
use super::config::CacheConfig;
use super::entry::{Records, StatRecord};
use super::error::ContentError;
use super::keys;
use super::store::SharedCache;

const SOURCE: &str = "cache::stat";
const METRIC_HIT: &str = "hydra_stat_cache_hit_total";
const METRIC_MISS: &str = "hydra_stat_cache_miss_total";

/// Caches file-system metadata under `stat-` keys with the same staleness
/// window as the attribute cache. Failed stats are cached too.
#[derive(Clone)]
pub struct StatCache {
    store: Arc<dyn BackingStore>,
    records: Records,
    clock: Arc<dyn Clock>,
    root: PathBuf,
    check_interval_ms: u64,
}

impl StatCache {
    pub fn new(
        store: Arc<dyn BackingStore>,
        cache: Arc<dyn SharedCache>,
        clock: Arc<dyn Clock>,
        root: impl Into<PathBuf>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            store,
            records: Records::new(cache, config.check_interval()),
            clock,
            root: root.into(),
            check_interval_ms: config.check_interval_ms,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cached metadata for `path`. A record carrying an error is returned as
    /// is; [`StatCache::is_file`] and [`StatCache::is_directory`] turn it into
    /// an `Err`.
    pub async fn get_stat(&self, path: &ResourcePath) -> Result<StatRecord, ContentError> {
        path.validate()?;

        let key = keys::stat_key(path);
        let now = self.clock.now_millis();

        if let Some(record) = self.records.load::<StatRecord>(&key).await {
            if now.saturating_sub(record.last_check) < self.check_interval_ms {
                counter!(METRIC_HIT).increment(1);
                return Ok(record);
            }
        }

        counter!(METRIC_MISS).increment(1);
        let backing = path.backing_path(&self.root);
        info!(target_module = SOURCE, path = %backing.display(), "stat path");

        let record = match self.store.stat(&backing).await {
            Ok(info) => StatRecord {
                last_check: now,
                error: None,
                path: backing,
                is_file: info.is_file,
                is_directory: info.is_directory,
            },
            Err(err) => {
                warn!(target_module = SOURCE, path = %backing.display(), error = %err, "stat failed");
                StatRecord {
                    last_check: now,
                    error: Some(err.to_string()),
                    path: backing,
                    is_file: false,
                    is_directory: false,
                }
            }
        };

        self.records.save(&key, &record).await;
        Ok(record)
    }

    /// Backing path when `path` names a regular file, `None` otherwise.
    pub async fn is_file(&self, path: &ResourcePath) -> Result<Option<PathBuf>, ContentError> {
        let record = self.checked_stat(path).await?;
        Ok(record.is_file.then_some(record.path))
    }

    /// Backing path when `path` names a directory, `None` otherwise.
    pub async fn is_directory(
        &self,
        path: &ResourcePath,
    ) -> Result<Option<PathBuf>, ContentError> {
        let record = self.checked_stat(path).await?;
        Ok(record.is_directory.then_some(record.path))
    }

    async fn checked_stat(&self, path: &ResourcePath) -> Result<StatRecord, ContentError> {
        let record = self.get_stat(path).await?;
        match record.error {
            Some(message) => Err(ContentError::backing_store(path.display_path(), message)),
            None => Ok(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::store::MemoryCache;
    use crate::infra::memory_store::MemoryStore;

    fn stat_cache() -> (StatCache, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(50_000));
        let config = CacheConfig::default();
        let shared = Arc::new(MemoryCache::new(config.capacity_non_zero(), clock.clone()));
        let cache = StatCache::new(store.clone(), shared, clock.clone(), "/content", &config);
        (cache, store, clock)
    }

    #[tokio::test]
    async fn missing_path_is_cached_as_error() {
        let (cache, store, clock) = stat_cache();
        let path = ResourcePath::new(["cs1"]);

        let record = cache.get_stat(&path).await.unwrap();
        assert!(record.error.is_some());
        assert!(!record.is_file && !record.is_directory);

        store.insert_dir("/content/cs1");
        assert!(cache.is_directory(&path).await.is_err());

        clock.advance(Duration::from_millis(5_000));
        assert_eq!(
            cache.is_directory(&path).await.unwrap(),
            Some(PathBuf::from("/content/cs1"))
        );
    }

    #[tokio::test]
    async fn file_is_not_a_directory() {
        let (cache, store, _clock) = stat_cache();
        store.insert("/content/cs1/index.hy", "$course Intro");
        let path = ResourcePath::new(["cs1", "index.hy"]);

        assert_eq!(
            cache.is_file(&path).await.unwrap(),
            Some(PathBuf::from("/content/cs1/index.hy"))
        );
        assert_eq!(cache.is_directory(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_path_is_rejected() {
        let (cache, _store, _clock) = stat_cache();
        let path = ResourcePath::new(["cs1", "..", ".."]);
        assert!(matches!(
            cache.get_stat(&path).await,
            Err(ContentError::PathInvalid(_))
        ));
    }
}
