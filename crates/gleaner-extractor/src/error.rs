//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur when setting up extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
