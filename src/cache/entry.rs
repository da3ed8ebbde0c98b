//! Records stored in the shared cache and the JSON codec around them.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::store::SharedCache;

const SOURCE: &str = "cache::entry";

/// Main entry for one document. Written whole on every reload, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainEntry {
    pub last_check: u64,
    pub error: Option<String>,
    pub short_attrs: HashMap<String, String>,
    pub long_names: HashSet<String>,
}

impl MainEntry {
    /// Entry recording a failed read so the failure is not retried until it expires.
    pub fn poisoned(last_check: u64, error: impl Into<String>) -> Self {
        Self {
            last_check,
            error: Some(error.into()),
            short_attrs: HashMap::new(),
            long_names: HashSet::new(),
        }
    }
}

/// Out-of-line value stamped with the `last_check` of the reload that wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongValueEntry {
    pub timestamp: u64,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub last_check: u64,
    pub error: Option<String>,
    pub path: PathBuf,
    pub is_file: bool,
    pub is_directory: bool,
}

/// Typed access to the shared cache. Client and codec failures never reach
/// callers: an unreadable record is a miss and a failed write is logged.
#[derive(Clone)]
pub(crate) struct Records {
    cache: Arc<dyn SharedCache>,
    ttl: Duration,
}

impl Records {
    pub(crate) fn new(cache: Arc<dyn SharedCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub(crate) async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(target_module = SOURCE, key, error = %err, "shared cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(target_module = SOURCE, key, error = %err, "discarding undecodable cache record");
                None
            }
        }
    }

    pub(crate) async fn save<T: Serialize>(&self, key: &str, record: &T) {
        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(target_module = SOURCE, key, error = %err, "failed to encode cache record");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, raw, self.ttl).await {
            warn!(target_module = SOURCE, key, error = %err, "shared cache write failed");
        }
    }
}
