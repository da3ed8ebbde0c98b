use thiserror::Error;

use crate::domain::path::PathError;

/// Failures surfaced by the attribute and stat caches.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("file path is invalid: {0}")]
    PathInvalid(#[from] PathError),
    /// Read or stat failure. Cached for one staleness window.
    #[error("could not read `{path}`: {message}")]
    BackingStore { path: String, message: String },
    #[error("required attribute `{name}` is missing")]
    MissingRequired { name: String },
}

impl ContentError {
    pub fn backing_store(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackingStore {
            path: path.into(),
            message: message.into(),
        }
    }
}
