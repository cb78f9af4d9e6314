//! Error types for report generation

use thiserror::Error;

/// Errors that can occur while building a report
///
/// A failing summarization call is not an error: the report is still written
/// with the failure in place of the summary.
#[derive(Error, Debug)]
pub enum DigestError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The report notification could not be written
    #[error("Notification error: {0}")]
    Notify(#[from] gleaner_filer::FilerError),
}
