//! Two-tier attribute cache over the backing store.
//!
//! Each document is cached as one main entry holding every value up to
//! `inline_value_limit` characters, plus one long-value entry per longer
//! value. Long-value entries carry the `last_check` stamp of the reload that
//! wrote them; a request that meets a missing long value or one with a
//! different stamp discards what it gathered and reloads the whole document.
//!
//! Reloads are not deduplicated. Concurrent callers that see the same expired
//! entry each reload, which is harmless because a reload derives the same
//! entries from the same document.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use metrics::counter;
use tracing::{debug, info, warn};

use crate::application::store::BackingStore;
use crate::domain::document::Document;
use crate::domain::path::ResourcePath;

use super::clock::Clock;
use super::config::CacheConfig;
use super::entry::{LongValueEntry, MainEntry, Records};
use super::error::ContentError;
use super::keys;
use super::request::{AttributeRequest, AttributeSet};
use super::store::SharedCache;

const SOURCE: &str = "cache::attributes";
const METRIC_HIT: &str = "hydra_attr_cache_hit_total";
const METRIC_RELOAD: &str = "hydra_attr_cache_reload_total";
const METRIC_HEAL: &str = "hydra_attr_cache_heal_total";
const METRIC_POISONED: &str = "hydra_attr_cache_poisoned_total";

#[derive(Clone)]
pub struct AttributeCache {
    store: Arc<dyn BackingStore>,
    records: Records,
    clock: Arc<dyn Clock>,
    root: PathBuf,
    config: CacheConfig,
}

impl AttributeCache {
    pub fn new(
        store: Arc<dyn BackingStore>,
        cache: Arc<dyn SharedCache>,
        clock: Arc<dyn Clock>,
        root: impl Into<PathBuf>,
        config: CacheConfig,
    ) -> Self {
        Self {
            store,
            records: Records::new(cache, config.check_interval()),
            clock,
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Resolve `request` against the document at `path`.
    ///
    /// Undeclared attributes resolve to the caller's default and never fail;
    /// only invalid paths and backing-store failures are errors.
    pub async fn get_properties(
        &self,
        path: &ResourcePath,
        request: &AttributeRequest,
    ) -> Result<AttributeSet, ContentError> {
        path.validate()?;

        let key = keys::attribute_key(path);
        let now = self.clock.now_millis();

        if let Some(entry) = self.records.load::<MainEntry>(&key).await {
            if now.saturating_sub(entry.last_check) < self.config.check_interval_ms {
                if let Some(set) = self.serve_fresh(path, &key, &entry, request).await? {
                    counter!(METRIC_HIT).increment(1);
                    return Ok(set);
                }
                counter!(METRIC_HEAL).increment(1);
                return self
                    .reload(path, &key, self.clock.now_millis(), request)
                    .await;
            }
        }

        self.reload(path, &key, now, request).await
    }

    /// Single attribute: the declared value, else `default`.
    pub async fn get_property(
        &self,
        path: &ResourcePath,
        name: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, ContentError> {
        let mut request = AttributeRequest::new();
        request.insert(name, default.map(str::to_owned));
        let set = self.get_properties(path, &request).await?;
        Ok(set.value(name).map(str::to_owned))
    }

    /// Resolve the same request against many documents concurrently, keyed by
    /// `to_key`. Every path is validated before any lookup starts; the first
    /// failure is returned.
    pub async fn get_properties_each<F>(
        &self,
        paths: &[ResourcePath],
        to_key: F,
        request: &AttributeRequest,
    ) -> Result<HashMap<String, AttributeSet>, ContentError>
    where
        F: Fn(&ResourcePath) -> String,
    {
        for path in paths {
            path.validate()?;
        }

        let to_key = &to_key;
        let lookups = paths
            .iter()
            .map(|path| async move { (to_key(path), self.get_properties(path, request).await) });

        let mut results = HashMap::with_capacity(paths.len());
        for (key, result) in join_all(lookups).await {
            results.insert(key, result?);
        }
        Ok(results)
    }

    /// Serve from a fresh main entry. `Ok(None)` means a long value is missing
    /// or belongs to another reload and the document must be reloaded.
    async fn serve_fresh(
        &self,
        path: &ResourcePath,
        key: &str,
        entry: &MainEntry,
        request: &AttributeRequest,
    ) -> Result<Option<AttributeSet>, ContentError> {
        if let Some(message) = entry.error.as_ref() {
            return Err(ContentError::backing_store(path.display_path(), message.clone()));
        }

        let long_names: Vec<&str> = request
            .iter()
            .map(|(name, _)| name)
            .filter(|name| entry.long_names.contains(*name))
            .collect();

        let fetched = join_all(long_names.iter().map(|name| {
            let long_key = keys::long_value_key(key, name);
            async move { self.records.load::<LongValueEntry>(&long_key).await }
        }))
        .await;

        let mut long_values = HashMap::with_capacity(long_names.len());
        for (name, long) in long_names.into_iter().zip(fetched) {
            match long {
                Some(long) if long.timestamp == entry.last_check => {
                    long_values.insert(name, long.value);
                }
                Some(long) => {
                    debug!(
                        target_module = SOURCE,
                        path = %path.display_path(),
                        attribute = name,
                        entry_stamp = entry.last_check,
                        value_stamp = long.timestamp,
                        "reload needed: stale long value"
                    );
                    return Ok(None);
                }
                None => {
                    debug!(
                        target_module = SOURCE,
                        path = %path.display_path(),
                        attribute = name,
                        "reload needed: missing long value"
                    );
                    return Ok(None);
                }
            }
        }

        Ok(Some(request.resolve(|name| {
            entry
                .short_attrs
                .get(name)
                .cloned()
                .or_else(|| long_values.get(name).cloned())
        })))
    }

    /// Read and parse the document, rewrite every entry for it and answer
    /// `request` from the parsed document.
    async fn reload(
        &self,
        path: &ResourcePath,
        key: &str,
        now: u64,
        request: &AttributeRequest,
    ) -> Result<AttributeSet, ContentError> {
        counter!(METRIC_RELOAD).increment(1);
        let display_path = path.display_path();
        info!(target_module = SOURCE, path = %display_path, "load document");

        let backing = path.backing_path(&self.root);
        let text = match self.store.read_text(&backing).await {
            Ok(text) => text,
            Err(err) => {
                warn!(target_module = SOURCE, path = %display_path, error = %err, "error while reading document");
                counter!(METRIC_POISONED).increment(1);
                let message = err.to_string();
                self.records
                    .save(key, &MainEntry::poisoned(now, message.clone()))
                    .await;
                return Err(ContentError::backing_store(display_path, message));
            }
        };

        let document = Document::parse(&text);
        self.write_entries(key, now, &document).await;

        Ok(request.resolve(|name| document.get(name).map(str::to_owned)))
    }

    /// Long values are written before the main entry that names them.
    async fn write_entries(&self, key: &str, now: u64, document: &Document) {
        let mut short_attrs = HashMap::new();
        let mut long_names = HashSet::new();
        let mut long_values = Vec::new();

        for (name, value) in document.iter() {
            if value.chars().count() <= self.config.inline_value_limit {
                short_attrs.insert(name.to_string(), value.to_string());
            } else {
                long_names.insert(name.to_string());
                long_values.push((
                    keys::long_value_key(key, name),
                    LongValueEntry {
                        timestamp: now,
                        value: value.to_string(),
                    },
                ));
            }
        }

        join_all(
            long_values
                .iter()
                .map(|(long_key, entry)| self.records.save(long_key, entry)),
        )
        .await;

        let entry = MainEntry {
            last_check: now,
            error: None,
            short_attrs,
            long_names,
        };
        self.records.save(key, &entry).await;
    }
}
