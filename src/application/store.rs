//! Backing-store trait describing where attribute documents live.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("`{}` does not exist", path.display())]
    NotFound { path: PathBuf },
    #[error("`{}` is not valid UTF-8 text", path.display())]
    Encoding { path: PathBuf },
    #[error("failed to access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatInfo {
    pub is_file: bool,
    pub is_directory: bool,
}

#[async_trait]
pub trait BackingStore: Send + Sync {
    async fn read_text(&self, path: &Path) -> Result<String, StoreError>;

    async fn stat(&self, path: &Path) -> Result<StatInfo, StoreError>;
}
