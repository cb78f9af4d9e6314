//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline, filing or review error
    #[error(transparent)]
    Filer(#[from] gleaner_filer::FilerError),

    /// Archive sweep error
    #[error(transparent)]
    Janitor(#[from] gleaner_janitor::JanitorError),

    /// Report generation error
    #[error(transparent)]
    Digest(#[from] gleaner_digest::DigestError),

    /// Classification service setup error
    #[error(transparent)]
    Llm(#[from] gleaner_llm::LlmError),

    /// Vault access error
    #[error(transparent)]
    Store(#[from] gleaner_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
