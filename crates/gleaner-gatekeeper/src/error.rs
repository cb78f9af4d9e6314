//! Error types for the Gatekeeper

use thiserror::Error;

/// Why a classifier reply was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Reply is not a JSON object
    #[error("Classification validation failed: {0}")]
    Parse(String),

    /// `destination` absent or not a string
    #[error("Classification validation failed: Missing 'destination' field")]
    MissingDestination,

    /// `destination` is not one of the five known values
    #[error("Classification validation failed: Invalid destination: {0}")]
    UnknownDestination(String),

    /// `confidence` absent or not a number
    #[error("Classification validation failed: Missing or invalid 'confidence' field")]
    MissingConfidence,

    /// `confidence` outside `[0, 1]`
    #[error("Classification validation failed: Confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    /// `data` absent or null
    #[error("Classification validation failed: Missing 'data' field")]
    MissingData,

    /// `data` present but not an object
    #[error("Classification validation failed: 'data' must be an object")]
    DataNotObject,
}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        ValidationError::Parse(e.to_string())
    }
}
