use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hydra::cache::{CacheConfig, ContentError, ManualClock, MemoryCache, StatCache};
use hydra::domain::path::ResourcePath;
use hydra::infra::memory_store::MemoryStore;

fn stat_cache(store: Arc<MemoryStore>, clock: Arc<ManualClock>) -> StatCache {
    let config = CacheConfig::default();
    let shared = Arc::new(MemoryCache::new(config.capacity_non_zero(), clock.clone()));
    StatCache::new(store, shared, clock, "/content", &config)
}

#[tokio::test]
async fn stat_result_is_cached_for_the_window() {
    let store = Arc::new(MemoryStore::new());
    store.insert("/content/cs1/index.hy", "$course Intro");
    let clock = Arc::new(ManualClock::new(0));
    let stats = stat_cache(store.clone(), clock.clone());
    let path = ResourcePath::new(["cs1", "index.hy"]);

    let record = stats.get_stat(&path).await.expect("stat succeeds");
    assert!(record.is_file);
    assert_eq!(record.path, PathBuf::from("/content/cs1/index.hy"));

    store.remove("/content/cs1/index.hy");
    clock.advance(Duration::from_millis(4_999));
    assert!(stats.get_stat(&path).await.expect("cached").is_file);

    clock.advance(Duration::from_millis(1));
    let record = stats.get_stat(&path).await.expect("stat record");
    assert!(record.error.is_some());
    assert!(matches!(
        stats.is_file(&path).await,
        Err(ContentError::BackingStore { .. })
    ));
}

#[tokio::test]
async fn routing_predicates_return_backing_paths() {
    let store = Arc::new(MemoryStore::new());
    store.insert("/content/cs1/intro/index.hy", "$lesson Intro");
    let stats = stat_cache(store, Arc::new(ManualClock::new(0)));

    let dir = ResourcePath::new(["cs1", "intro"]);
    assert_eq!(
        stats.is_directory(&dir).await.expect("directory exists"),
        Some(PathBuf::from("/content/cs1/intro"))
    );
    assert_eq!(stats.is_file(&dir).await.expect("directory exists"), None);
}

#[tokio::test]
async fn stat_and_attribute_namespaces_do_not_collide() {
    let store = Arc::new(MemoryStore::new());
    store.insert("/content/cs1/index.hy", "$course Intro");
    let stats = stat_cache(store, Arc::new(ManualClock::new(0)));

    let path = ResourcePath::new(["cs1", "index.hy"]);
    stats.get_stat(&path).await.expect("stat succeeds");
    assert_ne!(
        hydra::cache::keys::stat_key(&path),
        hydra::cache::keys::attribute_key(&path)
    );
}
