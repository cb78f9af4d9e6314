//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use gleaner_digest::Report;
use gleaner_domain::{CaptureEntry, Fingerprint};
use gleaner_filer::{ReconcileOutcome, ReconcileReport, RunSummary};
use gleaner_janitor::JanitorMetrics;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const PREVIEW_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a `process` run.
    pub fn format_run(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let results: Vec<serde_json::Value> = summary
                    .results
                    .iter()
                    .map(|r| match &r.outcome {
                        Ok(o) => serde_json::json!({
                            "entry_hash": r.entry_hash.as_str(),
                            "status": o.status.as_str(),
                            "destination": o.destination.as_str(),
                            "name": o.name,
                            "path": o.path,
                            "confidence": o.confidence,
                        }),
                        Err(message) => serde_json::json!({
                            "entry_hash": r.entry_hash.as_str(),
                            "status": "error",
                            "error": message,
                        }),
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "run_id": summary.run_id.to_string(),
                    "source_note": summary.source_note,
                    "entries_found": summary.entries_found,
                    "duplicates": summary.duplicates(),
                    "watermark": summary.watermark,
                    "summary_path": summary.summary_path,
                    "results": results,
                }))?)
            }
            OutputFormat::Quiet => Ok(summary
                .results
                .iter()
                .filter_map(|r| r.outcome.as_ref().ok().map(|o| o.path.clone()))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if summary.results.is_empty() {
                    let message = if summary.entries_found == 0 {
                        "No new entries to process".to_string()
                    } else {
                        format!("All {} entries already processed", summary.entries_found)
                    };
                    return Ok(self.warning(&message));
                }

                let mut builder = Builder::default();
                builder.push_record([
                    "Hash",
                    "Status",
                    "Destination",
                    "Name",
                    "Confidence",
                    "Entry",
                ]);
                for result in &summary.results {
                    let entry = preview(&result.text);
                    match &result.outcome {
                        Ok(o) => builder.push_record([
                            result.entry_hash.as_str(),
                            o.status.as_str(),
                            o.destination.as_str(),
                            &o.name,
                            &format!("{:.2}", o.confidence),
                            &entry,
                        ]),
                        Err(message) => builder.push_record([
                            result.entry_hash.as_str(),
                            "error",
                            "-",
                            message,
                            "-",
                            &entry,
                        ]),
                    }
                }

                let mut lines = vec![self.table(builder)];
                if summary.duplicates() > 0 {
                    lines.push(self.info(&format!(
                        "{} entries already processed",
                        summary.duplicates()
                    )));
                }
                if summary.errors() > 0 {
                    lines.push(self.error(&format!("{} entries failed", summary.errors())));
                }
                if let Some(path) = &summary.summary_path {
                    lines.push(self.success(&format!("Summary written to {}", path)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the result of a `reconcile` run.
    pub fn format_reconcile(&self, report: &ReconcileReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let results: Vec<serde_json::Value> = report
                    .results
                    .iter()
                    .map(|r| {
                        let mut value = serde_json::json!({
                            "hash": r.hash.as_str(),
                            "category": r.category.as_str(),
                            "outcome": r.outcome.as_str(),
                        });
                        match &r.outcome {
                            ReconcileOutcome::Reclassified(o) => {
                                value["path"] = o.path.clone().into();
                                value["status"] = o.status.as_str().into();
                            }
                            ReconcileOutcome::Error(message) => {
                                value["error"] = message.clone().into();
                            }
                            ReconcileOutcome::NotFound => {}
                        }
                        value
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "run_id": report.run_id.to_string(),
                    "summary_path": report.summary_path,
                    "results": results,
                }))?)
            }
            OutputFormat::Quiet => Ok(report
                .results
                .iter()
                .filter_map(|r| match &r.outcome {
                    ReconcileOutcome::Reclassified(o) => Some(o.path.clone()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if report.results.is_empty() {
                    return Ok(self.warning("No checked review items"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Hash", "Category", "Outcome", "Detail"]);
                for result in &report.results {
                    let detail = match &result.outcome {
                        ReconcileOutcome::Reclassified(o) => o.path.clone(),
                        ReconcileOutcome::NotFound => "not in the Inbox Log".to_string(),
                        ReconcileOutcome::Error(message) => message.clone(),
                    };
                    builder.push_record([
                        result.hash.as_str(),
                        result.category.as_str(),
                        result.outcome.as_str(),
                        &detail,
                    ]);
                }
                Ok(format!(
                    "{}\n{}",
                    self.table(builder),
                    self.success(&format!("Re-classified {} item(s)", report.reclassified()))
                ))
            }
        }
    }

    /// Format the result of an `archive` sweep.
    pub fn format_archive(&self, metrics: &JanitorMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "cutoff": metrics.cutoff.map(|d| d.to_string()),
                "dry_run": metrics.dry_run,
                "scanned": metrics.scanned,
                "archived": metrics.archived,
                "failed": metrics.failed,
                "retained": metrics.retained(),
                "summary_path": metrics.summary_path,
            }))?),
            OutputFormat::Quiet => Ok(metrics.archived.join("\n")),
            OutputFormat::Table => {
                let mut lines = vec![metrics.summary()];
                if metrics.total_archived() == 0 {
                    lines.push(self.warning("No logs older than the cutoff"));
                } else if metrics.dry_run {
                    for path in &metrics.archived {
                        lines.push(self.info(&format!("Would archive {}", path)));
                    }
                } else {
                    let archived = metrics.total_archived();
                    lines.push(self.success(&format!("Archived {} log(s)", archived)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a written digest or weekly review.
    pub fn format_report(&self, report: &Report) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "kind": report.kind.notice_kind(),
                "sources": report.sources,
                "summarized": report.summarized,
                "error": report.error,
                "path": report.path,
            }))?),
            OutputFormat::Quiet => Ok(report.path.clone()),
            OutputFormat::Table => {
                let mut lines = vec![report.body.trim_end().to_string(), String::new()];
                match &report.error {
                    Some(error) => lines.push(self.error(&format!("Summary failed: {}", error))),
                    None if !report.summarized => {
                        lines.push(self.warning("Nothing to summarize"))
                    }
                    None => {}
                }
                lines.push(self.success(&format!("Written to {}", report.path)));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format an extraction preview.
    pub fn format_entries(&self, entries: &[CaptureEntry], start_offset: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|e| serde_json::json!({"hash": e.hash.as_str(), "text": e.text}))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "start_offset": start_offset,
                    "entries": entries,
                }))?)
            }
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| e.hash.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.warning("No new entries"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Hash", "Entry"]);
                for entry in entries {
                    builder.push_record([entry.hash.as_str(), &preview(&entry.text)]);
                }
                Ok(format!(
                    "{}\n{}",
                    self.table(builder),
                    self.info(&format!("{} entries from offset {}", entries.len(), start_offset))
                ))
            }
        }
    }

    /// Format a fingerprint.
    pub fn format_hash(&self, hash: &Fingerprint) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
                "hash": hash.as_str()
            }))?),
            _ => Ok(hash.to_string()),
        }
    }

    /// Format the templates `init` wrote or found in place.
    pub fn format_init(&self, templates: &[(String, bool)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let items: Vec<serde_json::Value> = templates
                    .iter()
                    .map(|(path, created)| serde_json::json!({"path": path, "created": created}))
                    .collect();
                Ok(serde_json::to_string_pretty(&items)?)
            }
            OutputFormat::Quiet => Ok(templates
                .iter()
                .filter(|(_, created)| *created)
                .map(|(path, _)| path.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(templates
                .iter()
                .map(|(path, created)| {
                    if *created {
                        self.success(&format!("Created {}", path))
                    } else {
                        self.info(&format!("Kept existing {}", path))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// First line of an entry, shortened for a table cell
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS || text.contains('\n') {
        let short: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", short.trim_end())
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_domain::{Destination, FilingStatus};
    use gleaner_filer::{EntryResult, FilingOutcome};

    fn run_summary() -> RunSummary {
        let mom = CaptureEntry::new("Called Mom about the move");
        let milk = CaptureEntry::new("Bought milk");
        RunSummary {
            run_id: Default::default(),
            source_note: "Journal/2024-03-01".to_string(),
            entries_found: 3,
            results: vec![
                EntryResult {
                    entry_hash: mom.hash.clone(),
                    text: mom.text,
                    outcome: Ok(FilingOutcome {
                        entry_hash: mom.hash,
                        destination: Destination::People,
                        name: "Mom".to_string(),
                        path: "People/Mom.md".to_string(),
                        status: FilingStatus::Filed,
                        confidence: 0.9,
                    }),
                },
                EntryResult {
                    entry_hash: milk.hash,
                    text: milk.text,
                    outcome: Err("Template not found: Admin-Template".to_string()),
                },
            ],
            watermark: Some(120),
            summary_path: Some("Notifications/Processing-Summary-x.md".to_string()),
        }
    }

    #[test]
    fn test_run_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_run(&run_summary()).unwrap();
        assert!(output.contains("Destination"));
        assert!(output.contains("Mom"));
        assert!(output.contains("1 entries already processed"));
        assert!(output.contains("✗ 1 entries failed"));
    }

    #[test]
    fn test_run_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_run(&run_summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["entries_found"], 3);
        assert_eq!(value["results"][0]["path"], "People/Mom.md");
        assert_eq!(value["results"][1]["status"], "error");
    }

    #[test]
    fn test_run_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_run(&run_summary()).unwrap();
        assert_eq!(output, "People/Mom.md");
    }

    #[test]
    fn test_empty_run() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut summary = run_summary();
        summary.results.clear();
        summary.entries_found = 0;
        let output = formatter.format_run(&summary).unwrap();
        assert_eq!(output, "⚠ No new entries to process");
    }

    #[test]
    fn test_report_output() {
        let report = Report {
            kind: gleaner_digest::ReportKind::WeeklyReview,
            sources: 4,
            summarized: false,
            error: Some("Service error (HTTP 401): Invalid API Key".to_string()),
            path: "Notifications/Weekly-Review-x.md".to_string(),
            body: "# Weekly Review Error\n".to_string(),
        };
        let table = Formatter::new(OutputFormat::Table, false).format_report(&report).unwrap();
        assert!(table.starts_with("# Weekly Review Error\n"));
        assert!(table.contains("Summary failed: Service error (HTTP 401)"));
        assert!(table.ends_with("Written to Notifications/Weekly-Review-x.md"));

        let json = Formatter::new(OutputFormat::Json, false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "Weekly-Review");
        assert_eq!(value["sources"], 4);

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_report(&report).unwrap();
        assert_eq!(quiet, report.path);
    }

    #[test]
    fn test_hash_output() {
        let hash = Fingerprint::of("Bought milk");
        let plain = Formatter::new(OutputFormat::Table, true).format_hash(&hash).unwrap();
        assert_eq!(plain, hash.as_str());
        let json = Formatter::new(OutputFormat::Json, false).format_hash(&hash).unwrap();
        assert!(json.contains(hash.as_str()));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("first\nsecond"), "first...");
        assert_eq!(preview(&"x".repeat(80)).len(), PREVIEW_CHARS + 3);
    }
}
