//! Notification documents: run summaries and notices

use crate::clock::Stamp;
use crate::error::FilerError;
use crate::filer::RecordFiler;
use crate::pipeline::RunSummary;
use crate::review::{ReconcileOutcome, ReconcileReport};
use crate::unique_path;
use gleaner_domain::metadata::compose_document;
use gleaner_domain::traits::DocumentStore;
use gleaner_domain::{Destination, FilingStatus, Metadata};

impl<S: DocumentStore> RecordFiler<S> {
    /// Write a short notice such as "No new entries to process"
    pub fn write_notice(&mut self, message: &str, kind: &str) -> Result<String, FilerError> {
        let stamp = Stamp::now();
        let body = format!("# {}\n\n---\n*Generated on {}*\n", message, stamp.second());
        self.write_notification(kind, None, &body, &stamp)
    }

    /// Write the processing summary for a pipeline run
    pub fn write_processing_summary(&mut self, summary: &RunSummary) -> Result<String, FilerError> {
        let stamp = Stamp::now();
        let mut body = String::from("# Processing Complete\n\n");
        body.push_str(&format!(
            "**Processed:** {} entries from [[{}]]\n",
            summary.results.len(),
            summary.source_note
        ));

        let mut groups: Vec<(Destination, Vec<String>)> = Vec::new();
        let mut errors = Vec::new();
        for result in &summary.results {
            match &result.outcome {
                Ok(outcome) => {
                    let line = format!(
                        "- **{}** (confidence: {}, status: {})",
                        outcome.name, outcome.confidence, outcome.status
                    );
                    match groups.iter_mut().find(|(d, _)| *d == outcome.destination) {
                        Some((_, lines)) => lines.push(line),
                        None => groups.push((outcome.destination, vec![line])),
                    }
                }
                Err(message) => errors.push(format!("- `{}`: {}", result.entry_hash, message)),
            }
        }

        for (destination, lines) in &groups {
            body.push_str(&format!("\n## {} ({})\n", heading(*destination), lines.len()));
            for line in lines {
                body.push_str(line);
                body.push('\n');
            }
        }

        let review = summary.count(FilingStatus::NeedsReview);
        if review > 0 {
            body.push_str(&format!(
                "\n**{} items need clarification** - see [[{}]]\n",
                review,
                self.config().review_link()
            ));
        }

        if !errors.is_empty() {
            body.push_str(&format!("\n## Errors ({})\n", errors.len()));
            for line in &errors {
                body.push_str(line);
                body.push('\n');
            }
        }

        body.push_str(&format!(
            "\n---\n*Generated on {} at {}*\n",
            stamp.date(),
            stamp.time()
        ));

        let mut meta = Metadata::new();
        meta.insert("run_id", summary.run_id.to_string());
        meta.insert("source_note", format!("[[{}]]", summary.source_note));
        self.write_notification("Processing-Summary", Some(meta), &body, &stamp)
    }

    /// Write the summary of a reconcile run
    pub fn write_reclassification_summary(
        &mut self,
        report: &ReconcileReport,
    ) -> Result<String, FilerError> {
        let stamp = Stamp::now();
        let mut body = String::from("# Re-classification Complete\n\n");
        body.push_str(&format!("**Processed:** {} entries\n\n", report.results.len()));

        for result in &report.results {
            let line = match &result.outcome {
                ReconcileOutcome::Reclassified(outcome) => format!(
                    "- **{}** ({}, {})",
                    outcome.name, outcome.destination, outcome.status
                ),
                ReconcileOutcome::NotFound => format!(
                    "- Hash `{}` not found in {}",
                    result.hash,
                    self.config().inbox_log_folder
                ),
                ReconcileOutcome::Error(message) => {
                    format!("- Hash `{}`: {}", result.hash, message)
                }
            };
            body.push_str(&line);
            body.push('\n');
        }
        body.push_str(&format!("\n---\n*Generated on {}*\n", stamp.second()));

        let mut meta = Metadata::new();
        meta.insert("run_id", report.run_id.to_string());
        self.write_notification("Reclassification", Some(meta), &body, &stamp)
    }

    /// Write a notification document named after `kind` and `stamp`
    ///
    /// The header always carries `type`, `created` and `notification_type`;
    /// `extra` fields are added after them. Returns the document path.
    pub fn write_notification(
        &mut self,
        kind: &str,
        extra: Option<Metadata>,
        body: &str,
        stamp: &Stamp,
    ) -> Result<String, FilerError> {
        let mut meta = Metadata::new();
        meta.insert("type", "notification");
        meta.insert("created", stamp.second());
        meta.insert("notification_type", kind);
        for (key, value) in extra.iter().flat_map(|m| m.iter()) {
            meta.insert(key, value.clone());
        }

        let stem = format!("{}/{}-{}", self.config().notifications_folder, kind, stamp.file());
        let path = unique_path(self.store(), &stem);
        self.store_mut()
            .create(&path, &compose_document(&meta, body))
            .map_err(FilerError::store)?;
        Ok(path)
    }
}

fn heading(destination: Destination) -> &'static str {
    match destination {
        Destination::People => "People",
        Destination::Projects => "Projects",
        Destination::Ideas => "Ideas",
        Destination::Admin => "Admin",
        Destination::NeedsReview => "Needs Review",
    }
}
