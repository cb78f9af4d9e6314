//! Record filing: create or merge, then log

use crate::clock::Stamp;
use crate::config::VaultConfig;
use crate::error::FilerError;
use crate::inbox_log;
use crate::merge::merge_record;
use crate::template::{load_template, render, TemplateValues};
use gleaner_domain::traits::DocumentStore;
use gleaner_domain::{
    CaptureEntry, ClassificationResult, Destination, FilingStatus, Fingerprint, InboxLogEntry,
};
use tracing::info;

/// Longest record name kept, in characters
pub const MAX_NAME_CHARS: usize = 100;

/// What happened to one entry
#[derive(Debug, Clone, PartialEq)]
pub struct FilingOutcome {
    /// Fingerprint of the entry
    pub entry_hash: Fingerprint,

    /// Final destination
    pub destination: Destination,

    /// Record name, or a placeholder for review items
    pub name: String,

    /// Record or review artifact path
    pub path: String,

    /// Outcome status
    pub status: FilingStatus,

    /// Confidence that drove filing
    pub confidence: f64,
}

/// Files classified entries into the vault
///
/// Owns the store for the duration of a run. Every call to
/// [`file_or_merge`](Self::file_or_merge) appends exactly one Inbox Log entry.
pub struct RecordFiler<S: DocumentStore> {
    store: S,
    config: VaultConfig,
}

impl<S: DocumentStore> RecordFiler<S> {
    /// Create a new filer over `store`
    pub fn new(store: S, config: VaultConfig) -> Result<Self, FilerError> {
        config.validate().map_err(FilerError::Config)?;
        Ok(Self { store, config })
    }

    /// The vault layout
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying store, mutably
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give the store back
    pub fn into_store(self) -> S {
        self.store
    }

    /// File `result` for `entry`, read from `source`
    ///
    /// `needs_review` goes to the review queue. Otherwise the record
    /// `<collection>/<name>.md` is created from the category template or,
    /// when it already exists, merged into.
    pub fn file_or_merge(
        &mut self,
        result: &ClassificationResult,
        entry: &CaptureEntry,
        source: &str,
    ) -> Result<FilingOutcome, FilerError> {
        let Some(category) = result.destination.category() else {
            return self.enqueue(result, entry, source);
        };

        let spec = category.spec();
        let name = sanitize_name(result.name().as_deref());
        let path = format!("{}/{}.md", spec.collection, name);
        let stamp = Stamp::now();

        let status = if self.store.exists(&path) {
            let current = self.store.read(&path).map_err(FilerError::store)?;
            let merged = merge_record(&current, category, result, &entry.text, source, &stamp);
            self.store.write(&path, &merged).map_err(FilerError::store)?;
            FilingStatus::Merged
        } else {
            let template =
                load_template(&self.store, &self.config.templates_folder, spec.template)?;
            let values = TemplateValues::for_record(category, result, &entry.hash, source, &stamp);
            self.store
                .create(&path, &render(&template, &values))
                .map_err(FilerError::store)?;
            FilingStatus::Filed
        };

        self.log(
            InboxLogEntry {
                entry_hash: entry.hash.clone(),
                original_text: entry.text.clone(),
                filed_to: result.destination.as_str().to_string(),
                destination_name: Some(name.clone()),
                destination_path: Some(path.clone()),
                confidence: result.confidence,
                status,
                source_note: source.to_string(),
                created: stamp.second(),
                error_message: None,
            },
            &stamp,
        )?;

        info!(path = %path, status = %status, confidence = result.confidence, "Entry filed");
        Ok(FilingOutcome {
            entry_hash: entry.hash.clone(),
            destination: result.destination,
            name,
            path,
            status,
            confidence: result.confidence,
        })
    }

    /// Record a filing failure for `entry` and return the log path
    pub fn log_failure(
        &mut self,
        entry: &CaptureEntry,
        result: Option<&ClassificationResult>,
        source: &str,
        message: &str,
    ) -> Result<String, FilerError> {
        let stamp = Stamp::now();
        self.log(
            InboxLogEntry {
                entry_hash: entry.hash.clone(),
                original_text: entry.text.clone(),
                filed_to: result
                    .map(|r| r.destination.as_str())
                    .unwrap_or("error")
                    .to_string(),
                destination_name: None,
                destination_path: None,
                confidence: result.map(|r| r.confidence).unwrap_or(0.0),
                status: FilingStatus::Error,
                source_note: source.to_string(),
                created: stamp.second(),
                error_message: Some(message.to_string()),
            },
            &stamp,
        )
    }

    pub(crate) fn log(
        &mut self,
        entry: InboxLogEntry,
        stamp: &Stamp,
    ) -> Result<String, FilerError> {
        inbox_log::write_entry(&mut self.store, &self.config.inbox_log_folder, &entry, stamp)
    }
}

/// Record name from the classifier's `name`
///
/// Path-unsafe characters become `-`, leading dots and surrounding whitespace
/// are dropped, and the result is capped at [`MAX_NAME_CHARS`]. Missing or
/// blank names become `Untitled`.
pub fn sanitize_name(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let cleaned: String = cleaned
        .trim()
        .trim_start_matches('.')
        .chars()
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_end();

    if cleaned.is_empty() {
        "Untitled".to_string()
    } else {
        cleaned.to_string()
    }
}
