//! Inbox log entries - the audit trail of processed captures

use crate::{Fingerprint, Metadata, MetadataValue};

/// Document type tag written on every log entry
pub const LOG_TYPE: &str = "inbox-log";

/// Outcome recorded for one processed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilingStatus {
    /// A new record was created
    Filed,
    /// Merged into an existing record
    Merged,
    /// Routed to the review queue
    NeedsReview,
    /// Filing failed
    Error,
}

impl FilingStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Filed => "filed",
            FilingStatus::Merged => "merged",
            FilingStatus::NeedsReview => "needs_review",
            FilingStatus::Error => "error",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "filed" => Some(FilingStatus::Filed),
            "merged" => Some(FilingStatus::Merged),
            "needs_review" => Some(FilingStatus::NeedsReview),
            "error" => Some(FilingStatus::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record, written exactly once per processed entry
#[derive(Debug, Clone, PartialEq)]
pub struct InboxLogEntry {
    /// Fingerprint of the captured text
    pub entry_hash: Fingerprint,

    /// The captured text
    pub original_text: String,

    /// Destination name (`people`, ..., `needs_review`)
    pub filed_to: String,

    /// Record display name, if any
    pub destination_name: Option<String>,

    /// Record path, if any
    pub destination_path: Option<String>,

    /// Confidence of the classification that drove filing
    pub confidence: f64,

    /// Outcome
    pub status: FilingStatus,

    /// Source document path
    pub source_note: String,

    /// Local creation timestamp
    pub created: String,

    /// Failure description for `error` entries
    pub error_message: Option<String>,
}

impl InboxLogEntry {
    /// Encode as document metadata
    pub fn to_metadata(&self) -> Metadata {
        let optional = |v: &Option<String>| match v {
            Some(s) => MetadataValue::Text(s.clone()),
            None => MetadataValue::Null,
        };

        let mut meta = Metadata::new();
        meta.insert("type", LOG_TYPE);
        meta.insert("created", self.created.clone());
        meta.insert("entry_hash", self.entry_hash.as_str());
        meta.insert("original_text", self.original_text.clone());
        meta.insert("filed_to", self.filed_to.clone());
        meta.insert("destination_name", optional(&self.destination_name));
        meta.insert("destination_path", optional(&self.destination_path));
        meta.insert("confidence", self.confidence);
        meta.insert("status", self.status.as_str());
        meta.insert("source_note", self.source_note.clone());
        if self.error_message.is_some() {
            meta.insert("error_message", optional(&self.error_message));
        }
        meta
    }

    /// Decode from document metadata
    ///
    /// Returns `None` unless the hash, text and status are all present.
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        let text = |key: &str| meta.get_str(key).map(str::to_string);
        Some(Self {
            entry_hash: Fingerprint::from_string(meta.get_str("entry_hash")?),
            original_text: text("original_text")?,
            filed_to: text("filed_to").unwrap_or_default(),
            destination_name: text("destination_name"),
            destination_path: text("destination_path"),
            confidence: meta.get_f64("confidence").unwrap_or(0.0),
            status: FilingStatus::parse(meta.get_str("status")?)?,
            source_note: text("source_note").unwrap_or_default(),
            created: text("created").unwrap_or_default(),
            error_message: text("error_message"),
        })
    }
}
