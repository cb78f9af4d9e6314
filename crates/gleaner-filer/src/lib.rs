//! Gleaner Filer
//!
//! Files classified entries into the vault and runs the capture pipeline.
//!
//! # Overview
//!
//! - [`RecordFiler`] creates a record from its category template or merges
//!   into the existing one, and appends one Inbox Log document per entry.
//! - Low-confidence entries go to the review queue: a clarification artifact
//!   plus a checklist item in the review document. Checked items are drained
//!   by [`RecordFiler::reconcile`].
//! - [`Pipeline`] ties extraction, deduplication, classification and filing
//!   together for one source document and commits its watermark.
//!
//! # Architecture
//!
//! ```text
//! Note → EntryExtractor → dedupe(Inbox Log) → Classifier → RecordFiler ─┬─ People/Projects/Ideas/Admin
//!                                                                       ├─ Needs-Review checklist
//!                                                                       └─ Inbox-Log
//! ```
//!
//! # Example Usage
//!
//! ```
//! use gleaner_classifier::{Classifier, ClassifierConfig};
//! use gleaner_domain::traits::DocumentStore;
//! use gleaner_domain::Category;
//! use gleaner_extractor::EntryExtractor;
//! use gleaner_filer::{default_template, Pipeline, RecordFiler, VaultConfig};
//! use gleaner_llm::MockProvider;
//! use gleaner_store::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = MemoryStore::new();
//! store.create("Templates/Person-Template.md", default_template(Category::People))?;
//! store.create("Journal/today.md", "## Journal\n\nCalled Mom about the move\n")?;
//!
//! let llm = MockProvider::new(
//!     r#"{"destination": "people", "confidence": 0.9, "data": {"name": "Mom"}}"#,
//! );
//! let mut pipeline = Pipeline::new(
//!     RecordFiler::new(store, VaultConfig::default())?,
//!     Classifier::new(llm, ClassifierConfig::default()),
//!     EntryExtractor::default_config(),
//! );
//!
//! let summary = pipeline.process_note("Journal/today.md").await?;
//! assert_eq!(summary.results.len(), 1);
//! assert!(pipeline.filer().store().exists("People/Mom.md"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod filer;
mod inbox_log;
mod lock;
mod merge;
mod notify;
mod pipeline;
mod review;
mod template;

pub use clock::Stamp;
pub use config::VaultConfig;
pub use error::FilerError;
pub use filer::{sanitize_name, FilingOutcome, RecordFiler, MAX_NAME_CHARS};
pub use inbox_log::{find_by_hash, known_hashes};
pub use lock::RunLock;
pub use merge::{append_field, merge_record};
pub use pipeline::{source_link, EntryResult, Pipeline, RunSummary};
pub use review::{
    parse_review_document, ParsedReview, ReconcileOutcome, ReconcileReport, ReconcileResult,
    ReviewItem, CATEGORY_PLACEHOLDER,
};
pub use template::{default_template, load_template, render, TemplateValues};

use gleaner_domain::traits::DocumentStore;

/// `<stem>.md`, or `<stem>-2.md`, `<stem>-3.md`, ... if taken
pub(crate) fn unique_path<S: DocumentStore>(store: &S, stem: &str) -> String {
    let path = format!("{}.md", stem);
    if !store.exists(&path) {
        return path;
    }
    (2..)
        .map(|n| format!("{}-{}.md", stem, n))
        .find(|candidate| !store.exists(candidate))
        .unwrap_or(path)
}
