//! Error types for the Classifier

use gleaner_gatekeeper::ValidationError;
use thiserror::Error;

/// Errors that can occur while classifying one entry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The classification service failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// The reply did not satisfy the result contract
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service did not answer in time
    #[error("Classification timed out after {0}s")]
    Timeout(u64),
}
