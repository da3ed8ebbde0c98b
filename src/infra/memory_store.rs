//! In-memory backing store for tests and dry runs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;

use crate::application::store::{BackingStore, StatInfo, StoreError};

const SOURCE: &str = "infra::memory_store";

#[derive(Debug, Default)]
struct Tree {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

/// Map of absolute paths to document text. Counts reads so callers can tell
/// a cache hit from a reload.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tree: Mutex<Tree>,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` at `path`, registering every ancestor as a directory.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let path = path.into();
        let mut tree = self.lock("insert");
        for ancestor in path.ancestors().skip(1) {
            tree.directories.insert(ancestor.to_path_buf());
        }
        tree.files.insert(path, text.into());
    }

    pub fn insert_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut tree = self.lock("insert_dir");
        for ancestor in path.ancestors() {
            tree.directories.insert(ancestor.to_path_buf());
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut tree = self.lock("remove");
        tree.files.remove(path);
        tree.directories.remove(path);
    }

    /// Number of `read_text` calls so far, successful or not.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, Tree> {
        match self.tree.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    target_module = SOURCE,
                    result = "poisoned_recovered",
                    "Recovered from poisoned memory store lock"
                );
                poisoned.into_inner()
            }
        }
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn read_text(&self, path: &Path) -> Result<String, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.lock("read_text")
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_path_buf(),
            })
    }

    async fn stat(&self, path: &Path) -> Result<StatInfo, StoreError> {
        let tree = self.lock("stat");
        let is_file = tree.files.contains_key(path);
        let is_directory = tree.directories.contains(path);
        if !is_file && !is_directory {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(StatInfo {
            is_file,
            is_directory,
        })
    }
}
