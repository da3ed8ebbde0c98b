//! File-system backing store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::store::{BackingStore, StatInfo, StoreError};

/// Reads documents from the local file system. Paths handed in are already
/// rooted; the store never joins or checks them itself.
#[derive(Debug, Default, Clone)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BackingStore for FsStore {
    async fn read_text(&self, path: &Path) -> Result<String, StoreError> {
        let bytes = fs::read(path)
            .await
            .map_err(|err| StoreError::from_io(path, err))?;
        String::from_utf8(bytes).map_err(|_| StoreError::Encoding {
            path: PathBuf::from(path),
        })
    }

    async fn stat(&self, path: &Path) -> Result<StatInfo, StoreError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|err| StoreError::from_io(path, err))?;
        Ok(StatInfo {
            is_file: metadata.is_file(),
            is_directory: metadata.is_dir(),
        })
    }
}
