//! Error types for filing

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while filing, reviewing or committing a run
#[derive(Error, Debug)]
pub enum FilerError {
    /// Category template missing from the templates folder
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Document store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Another run holds the lock for this source document
    #[error("Run already in progress for {0}")]
    Locked(String),

    /// Lock file could not be created
    #[error("Lock error at {path}: {source}")]
    Lock {
        /// Lock file path
        path: PathBuf,
        /// Cause
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FilerError {
    /// Wrap a store error
    pub(crate) fn store(e: impl std::fmt::Display) -> Self {
        FilerError::Store(e.to_string())
    }
}
