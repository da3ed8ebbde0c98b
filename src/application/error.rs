use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::hierarchy::HierarchyError, cache::ContentError, config::LoadError,
    infra::error::InfraError,
};

/// Chain of messages from an error and its sources, outermost first.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit code for the inspector binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Content(ContentError::PathInvalid(_))
            | AppError::Hierarchy(
                HierarchyError::MissingIdentifier { .. } | HierarchyError::InvalidIdentifier { .. },
            ) => 2,
            AppError::Content(_) | AppError::Hierarchy(_) => 1,
            AppError::Config(_) => 78,
            AppError::Infra(_) | AppError::Output(_) => 70,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}
