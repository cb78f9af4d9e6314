//! One processing run over a source document

use crate::clock::Stamp;
use crate::error::FilerError;
use crate::filer::{FilingOutcome, RecordFiler};
use crate::inbox_log::known_hashes;
use crate::lock::RunLock;
use crate::review::ReconcileReport;
use gleaner_classifier::Classifier;
use gleaner_domain::metadata::{header_end, set_header_keys, split_document};
use gleaner_domain::traits::{DocumentStore, LlmProvider};
use gleaner_domain::{FilingStatus, Fingerprint, Watermark};
use gleaner_extractor::{dedupe, EntryExtractor};
use std::path::PathBuf;
use tracing::{error, info, warn};
use uuid::Uuid;

const NOTICE_KIND: &str = "daily-processing";

/// Result for one entry of a run
#[derive(Debug, Clone, PartialEq)]
pub struct EntryResult {
    /// Fingerprint of the entry
    pub entry_hash: Fingerprint,

    /// Entry text
    pub text: String,

    /// Filing outcome, or the error that stopped filing
    pub outcome: Result<FilingOutcome, String>,
}

/// Everything a run did
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: Uuid,

    /// Source document, as cited in records (`Journal/2024-03-01`)
    pub source_note: String,

    /// Entries found past the watermark, before deduplication
    pub entries_found: usize,

    /// One result per new entry, in document order
    pub results: Vec<EntryResult>,

    /// Committed watermark offset; `None` when the note was left untouched
    pub watermark: Option<usize>,

    /// Summary or notice document written at the end of the run
    pub summary_path: Option<String>,
}

impl RunSummary {
    /// Entries that reached `status`
    pub fn count(&self, status: FilingStatus) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.as_ref().is_ok_and(|o| o.status == status))
            .count()
    }

    /// Entries that failed to file
    pub fn errors(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_err()).count()
    }

    /// Entries skipped as already processed
    pub fn duplicates(&self) -> usize {
        self.entries_found.saturating_sub(self.results.len())
    }
}

/// Capture → dedupe → classify → file, for one source document at a time
pub struct Pipeline<S, L>
where
    S: DocumentStore,
    L: LlmProvider,
{
    filer: RecordFiler<S>,
    classifier: Classifier<L>,
    extractor: EntryExtractor,
    lock_dir: Option<PathBuf>,
}

impl<S, L> Pipeline<S, L>
where
    S: DocumentStore,
    L: LlmProvider,
{
    /// Create a new pipeline
    pub fn new(
        filer: RecordFiler<S>,
        classifier: Classifier<L>,
        extractor: EntryExtractor,
    ) -> Self {
        Self {
            filer,
            classifier,
            extractor,
            lock_dir: None,
        }
    }

    /// Take a run lock per source document inside `dir`
    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = Some(dir.into());
        self
    }

    /// The filer
    pub fn filer(&self) -> &RecordFiler<S> {
        &self.filer
    }

    /// The classifier
    pub fn classifier(&self) -> &Classifier<L> {
        &self.classifier
    }

    /// Give the filer (and its store) back
    pub fn into_filer(self) -> RecordFiler<S> {
        self.filer
    }

    /// Process the new entries of the document at `path`
    ///
    /// Entries are handled one at a time, in document order. A filing error
    /// is logged as an `error` entry and the run continues. The watermark and
    /// the summary are written only after the whole batch; a failure there
    /// aborts the run.
    pub async fn process_note(&mut self, path: &str) -> Result<RunSummary, FilerError> {
        let _lock = match &self.lock_dir {
            Some(dir) => Some(RunLock::acquire(dir, path)?),
            None => None,
        };

        let run_id = Uuid::now_v7();
        let text = self.filer.store().read(path).map_err(FilerError::store)?;
        let (meta, _) = split_document(&text);
        let watermark = Watermark::from_metadata(&meta);
        let extraction = self.extractor.extract(&text, watermark.last_processed_offset);

        let mut summary = RunSummary {
            run_id,
            source_note: source_link(path).to_string(),
            entries_found: extraction.entries.len(),
            results: Vec::new(),
            watermark: None,
            summary_path: None,
        };
        info!(
            run_id = %run_id,
            note = path,
            offset = extraction.start_offset,
            entries = summary.entries_found,
            "Entries extracted"
        );

        if extraction.entries.is_empty() {
            summary.summary_path =
                Some(self.filer.write_notice("No new entries to process", NOTICE_KIND)?);
            return Ok(summary);
        }

        let known = known_hashes(self.filer.store(), &self.filer.config().inbox_log_folder);
        let fresh = dedupe(extraction.entries, &known);
        if fresh.is_empty() {
            info!(run_id = %run_id, "All entries already processed");
            let committed = self.commit_watermark(path, &text, extraction.proposed_watermark)?;
            summary.watermark = Some(committed);
            summary.summary_path =
                Some(self.filer.write_notice("All entries already processed", NOTICE_KIND)?);
            return Ok(summary);
        }

        info!(run_id = %run_id, new = fresh.len(), "Processing new entries");
        for entry in fresh {
            let result = self.classifier.classify(&entry.text).await;
            let outcome = match self.filer.file_or_merge(&result, &entry, &summary.source_note) {
                Ok(outcome) => Ok(outcome),
                Err(e) => {
                    error!(run_id = %run_id, hash = %entry.hash, "Filing failed: {}", e);
                    let message = e.to_string();
                    if let Err(log_err) =
                        self.filer
                            .log_failure(&entry, Some(&result), &summary.source_note, &message)
                    {
                        warn!(hash = %entry.hash, "Could not log filing failure: {}", log_err);
                    }
                    Err(message)
                }
            };
            summary.results.push(EntryResult {
                entry_hash: entry.hash,
                text: entry.text,
                outcome,
            });
        }

        let committed = self.commit_watermark(path, &text, extraction.proposed_watermark)?;
        summary.watermark = Some(committed);
        summary.summary_path = Some(self.filer.write_processing_summary(&summary)?);

        info!(
            run_id = %run_id,
            filed = summary.count(FilingStatus::Filed),
            merged = summary.count(FilingStatus::Merged),
            needs_review = summary.count(FilingStatus::NeedsReview),
            errors = summary.errors(),
            "Run complete"
        );
        Ok(summary)
    }

    /// Drain the checked review items
    pub async fn reconcile(&mut self) -> Result<ReconcileReport, FilerError> {
        self.filer.reconcile(&self.classifier).await
    }

    /// Persist the watermark on the source document
    ///
    /// `proposed` indexes the snapshot that was extracted. Only the two
    /// watermark lines of the header are touched; the rest of the user's
    /// header stays byte-for-byte. Rewriting those lines shifts the body, so
    /// the stored offset is rebased onto the new header. The document is
    /// re-read first so edits made during the run survive.
    fn commit_watermark(
        &mut self,
        path: &str,
        snapshot: &str,
        proposed: usize,
    ) -> Result<usize, FilerError> {
        let processed_body = proposed.saturating_sub(header_end(snapshot).unwrap_or(0));
        let current = self.filer.store().read(path).map_err(FilerError::store)?;
        let (meta, _) = split_document(&current);
        let previous = Watermark::from_metadata(&meta);
        let stamp = Stamp::now().second();

        // The offset lives inside the header it points past, so its width
        // feeds back into its value. Settles in a couple of rounds.
        let mut offset = processed_body;
        let mut committed = previous.clone();
        let mut updated = current.clone();
        for _ in 0..4 {
            committed = previous.clone();
            committed.advance(offset, stamp.clone());
            updated = set_header_keys(&current, &committed.header_updates());
            let settled = header_end(&updated).unwrap_or(0) + processed_body;
            if committed.last_processed_offset >= settled {
                break;
            }
            offset = settled;
        }

        self.filer
            .store_mut()
            .write(path, &updated)
            .map_err(FilerError::store)?;
        info!(note = path, offset = committed.last_processed_offset, "Watermark committed");
        Ok(committed.last_processed_offset)
    }
}

/// Document path as cited in wiki links: without the `.md` extension
pub fn source_link(path: &str) -> &str {
    path.strip_suffix(".md").unwrap_or(path)
}
