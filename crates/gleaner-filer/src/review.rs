//! Review queue: clarification requests and reconciliation
//!
//! Low-confidence entries become a checklist item in the review document:
//!
//! ```text
//! - [ ] **2024-03-01-100000** | Hash: `h6wpldl` | [[Journal/2024-03-01]]
//!   - Category: [people/projects/ideas/admin]
//!   - Original: Bought milk
//!   - Reason: Could be admin or nothing at all
//! ```
//!
//! The user replaces the category placeholder with one category and checks
//! the box. [`RecordFiler::reconcile`] then re-classifies each checked item
//! with the chosen category and files it, and rewrites the document without
//! the consumed lines.

use crate::clock::Stamp;
use crate::error::FilerError;
use crate::filer::{FilingOutcome, RecordFiler};
use crate::inbox_log::find_by_hash;
use crate::unique_path;
use gleaner_classifier::Classifier;
use gleaner_domain::metadata::compose_document;
use gleaner_domain::traits::{DocumentStore, LlmProvider};
use gleaner_domain::{
    excerpt, CaptureEntry, Category, ClassificationResult, Destination, FilingStatus, Fingerprint,
    InboxLogEntry, Metadata, MetadataValue,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Category line text until the user picks one
pub const CATEGORY_PLACEHOLDER: &str = "[people/projects/ideas/admin]";

/// Characters of the original text shown in a checklist item
pub const CHECKLIST_EXCERPT_CHARS: usize = 100;

const DETAIL_LINES: usize = 3;

/// A checked checklist item ready to reconcile
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    /// Hash of the entry under review
    pub hash: Fingerprint,

    /// Category the user chose
    pub category: Category,
}

/// Review document split into consumable items and lines to keep
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReview<'a> {
    /// Checked, parseable items in document order
    pub items: Vec<ReviewItem>,

    /// Every line not belonging to a consumed item, verbatim
    pub remaining: Vec<&'a str>,
}

/// Split a review document into checked items and the lines to keep
///
/// A checked line (`- [x]`, either case) is consumed together with up to three
/// indented detail lines when it carries a backticked hash and its
/// `- Category:` detail names a category. Anything else, including checked
/// items whose category is still the placeholder, is kept.
pub fn parse_review_document(text: &str) -> ParsedReview<'_> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut items = Vec::new();
    let mut remaining = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if is_checked(line) {
            let details: Vec<&str> = lines[i + 1..]
                .iter()
                .take(DETAIL_LINES)
                .take_while(|l| l.starts_with("  "))
                .copied()
                .collect();
            let hash = checklist_hash(line);
            let category = details.iter().find_map(|d| chosen_category(d));
            if let (Some(hash), Some(category)) = (hash, category) {
                items.push(ReviewItem { hash, category });
                i += 1 + details.len();
                continue;
            }
        }
        remaining.push(line);
        i += 1;
    }

    ParsedReview { items, remaining }
}

fn is_checked(line: &str) -> bool {
    line.starts_with("- [x]") || line.starts_with("- [X]")
}

fn checklist_hash(line: &str) -> Option<Fingerprint> {
    let start = line.find("Hash: `")? + "Hash: `".len();
    let len = line[start..].find('`')?;
    (len > 0).then(|| Fingerprint::from_string(&line[start..start + len]))
}

fn chosen_category(detail: &str) -> Option<Category> {
    let rest = detail.trim_start().strip_prefix("- Category:")?.trim_start();
    let rest = rest.strip_prefix('[').unwrap_or(rest);
    let word_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    // `[people/projects/...]` means the placeholder was never edited
    if rest[word_len..].starts_with('/') {
        return None;
    }
    Category::parse(&rest[..word_len])
}

/// Outcome of reconciling one checked item
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Filed under the chosen category
    Reclassified(FilingOutcome),

    /// No Inbox Log entry carries the hash
    NotFound,

    /// Re-classification or filing failed
    Error(String),
}

impl ReconcileOutcome {
    /// Get the outcome name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Reclassified(_) => "reclassified",
            ReconcileOutcome::NotFound => "not_found",
            ReconcileOutcome::Error(_) => "error",
        }
    }
}

/// One reconciled item
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileResult {
    /// Hash of the entry
    pub hash: Fingerprint,

    /// Category the user chose
    pub category: Category,

    /// What happened
    pub outcome: ReconcileOutcome,
}

/// Result of one reconcile run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    /// Run identifier
    pub run_id: Uuid,

    /// One result per consumed item
    pub results: Vec<ReconcileResult>,

    /// Reclassification summary document, when one was written
    pub summary_path: Option<String>,
}

impl ReconcileReport {
    /// Number of items filed under their chosen category
    pub fn reclassified(&self) -> usize {
        self.count("reclassified")
    }

    /// Number of items whose hash was not in the log
    pub fn not_found(&self) -> usize {
        self.count("not_found")
    }

    /// Number of items that failed
    pub fn errors(&self) -> usize {
        self.count("error")
    }

    fn count(&self, name: &str) -> usize {
        self.results.iter().filter(|r| r.outcome.as_str() == name).count()
    }
}

impl<S: DocumentStore> RecordFiler<S> {
    /// Route `entry` to human review
    ///
    /// Writes a clarification artifact, appends a checklist item to the
    /// review document (creating it if needed) and logs a `needs_review`
    /// entry pointing at the artifact.
    pub fn enqueue(
        &mut self,
        result: &ClassificationResult,
        entry: &CaptureEntry,
        source: &str,
    ) -> Result<FilingOutcome, FilerError> {
        let stamp = Stamp::now();
        let artifact = self.write_clarification(result, entry, source, &stamp)?;
        self.append_review_item(result, entry, source, &stamp)?;

        self.log(
            InboxLogEntry {
                entry_hash: entry.hash.clone(),
                original_text: entry.text.clone(),
                filed_to: Destination::NeedsReview.as_str().to_string(),
                destination_name: Some("Pending".to_string()),
                destination_path: Some(artifact.clone()),
                confidence: result.confidence,
                status: FilingStatus::NeedsReview,
                source_note: source.to_string(),
                created: stamp.second(),
                error_message: None,
            },
            &stamp,
        )?;

        info!(hash = %entry.hash, confidence = result.confidence, "Entry queued for review");
        Ok(FilingOutcome {
            entry_hash: entry.hash.clone(),
            destination: Destination::NeedsReview,
            name: "Clarification requested".to_string(),
            path: artifact,
            status: FilingStatus::NeedsReview,
            confidence: result.confidence,
        })
    }

    fn write_clarification(
        &mut self,
        result: &ClassificationResult,
        entry: &CaptureEntry,
        source: &str,
        stamp: &Stamp,
    ) -> Result<String, FilerError> {
        let reason = result
            .reason()
            .unwrap_or_else(|| "Unclear classification".to_string());
        let categories = result.possible_categories();

        let mut meta = Metadata::new();
        meta.insert("type", "notification");
        meta.insert("created", stamp.second());
        meta.insert("notification_type", "clarification_needed");
        meta.insert("source_note", format!("[[{}]]", source));
        meta.insert("entry_hash", entry.hash.as_str());
        meta.insert("original_text", entry.text.clone());
        meta.insert("confidence", result.confidence);
        meta.insert("possible_categories", MetadataValue::List(categories.clone()));
        meta.insert("reason", reason.clone());

        let quoted: Vec<String> = entry.text.lines().map(|l| format!("> {}", l)).collect();
        let body = format!(
            "# Clarification Needed\n\n\
             **Original Text:**\n{quoted}\n\n\
             **Confidence:** {confidence}\n\
             **Possible Categories:** {categories}\n\
             **Reason:** {reason}\n\n\
             ---\n\n\
             ## How to Fix\n\n\
             1. Open [[{review}]]\n\
             2. Find this entry in the task list (hash: `{hash}`)\n\
             3. Edit the \"Category:\" line to one of: people, projects, ideas, admin\n\
             4. Check the box when ready\n\
             5. Run `gleaner reconcile`\n\n\
             *Generated on {generated}*\n",
            quoted = quoted.join("\n"),
            confidence = result.confidence,
            categories = categories.join(", "),
            reason = reason,
            review = self.config().review_link(),
            hash = entry.hash,
            generated = stamp.second(),
        );

        let stem = format!(
            "{}/Clarification-{}-{}",
            self.config().notifications_folder,
            stamp.file(),
            entry.hash
        );
        let path = unique_path(self.store(), &stem);
        self.store_mut()
            .create(&path, &compose_document(&meta, &body))
            .map_err(FilerError::store)?;
        Ok(path)
    }

    fn append_review_item(
        &mut self,
        result: &ClassificationResult,
        entry: &CaptureEntry,
        source: &str,
        stamp: &Stamp,
    ) -> Result<(), FilerError> {
        let original = excerpt(&entry.text, CHECKLIST_EXCERPT_CHARS).replace('\n', " ");
        let reason = result.reason().unwrap_or_else(|| "Unclear".to_string());
        let item = format!(
            "- [ ] **{}** | Hash: `{}` | [[{}]]\n  - Category: {}\n  - Original: {}\n  - Reason: {}\n",
            stamp.file(),
            entry.hash,
            source,
            CATEGORY_PLACEHOLDER,
            original,
            reason.replace('\n', " "),
        );

        let path = self.config().review_document.clone();
        if self.store().exists(&path) {
            let mut doc = self.store().read(&path).map_err(FilerError::store)?;
            if !doc.ends_with('\n') {
                doc.push('\n');
            }
            doc.push('\n');
            doc.push_str(&item);
            self.store_mut().write(&path, &doc).map_err(FilerError::store)
        } else {
            let doc = format!(
                "# Needs Review\n\n\
                 Entries awaiting manual classification. Edit the \"Category:\" line and \
                 check the box, then run `gleaner reconcile`.\n\n{}",
                item
            );
            self.store_mut().create(&path, &doc).map_err(FilerError::store)
        }
    }

    /// Drain the checked items of the review document
    ///
    /// Each item's hash is looked up in the Inbox Log, re-classified with the
    /// chosen category at the classifier's reconcile confidence and filed.
    /// Consumed items are removed from the document whatever their outcome;
    /// everything else is kept verbatim. A reclassification summary is
    /// written when anything was consumed.
    pub async fn reconcile<L: LlmProvider>(
        &mut self,
        classifier: &Classifier<L>,
    ) -> Result<ReconcileReport, FilerError> {
        let mut report = ReconcileReport {
            run_id: Uuid::now_v7(),
            results: Vec::new(),
            summary_path: None,
        };

        let path = self.config().review_document.clone();
        if !self.store().exists(&path) {
            info!("No review document, nothing to reconcile");
            return Ok(report);
        }

        let text = self.store().read(&path).map_err(FilerError::store)?;
        let parsed = parse_review_document(&text);
        if parsed.items.is_empty() {
            info!("No checked review items");
            return Ok(report);
        }

        info!(run_id = %report.run_id, items = parsed.items.len(), "Reconciling review items");
        for item in &parsed.items {
            let outcome = self.reconcile_item(item, classifier).await;
            report.results.push(ReconcileResult {
                hash: item.hash.clone(),
                category: item.category,
                outcome,
            });
        }

        self.store_mut()
            .write(&path, &parsed.remaining.join("\n"))
            .map_err(FilerError::store)?;
        report.summary_path = Some(self.write_reclassification_summary(&report)?);
        Ok(report)
    }

    async fn reconcile_item<L: LlmProvider>(
        &mut self,
        item: &ReviewItem,
        classifier: &Classifier<L>,
    ) -> ReconcileOutcome {
        let folder = self.config().inbox_log_folder.clone();
        let Some(logged) = find_by_hash(self.store(), &folder, &item.hash) else {
            warn!(hash = %item.hash, "Review item not found in the inbox log");
            return ReconcileOutcome::NotFound;
        };

        let confidence = classifier.config().reconcile_confidence;
        let classified = match classifier
            .classify_forced(&logged.original_text, item.category, confidence)
            .await
        {
            Ok(classified) => classified,
            Err(e) => {
                warn!(hash = %item.hash, "Re-classification failed: {}", e);
                return ReconcileOutcome::Error(e.to_string());
            }
        };

        let entry = CaptureEntry {
            text: logged.original_text,
            hash: logged.entry_hash,
        };
        match self.file_or_merge(&classified, &entry, &logged.source_note) {
            Ok(outcome) => ReconcileOutcome::Reclassified(outcome),
            Err(e) => {
                warn!(hash = %item.hash, "Filing reclassified entry failed: {}", e);
                ReconcileOutcome::Error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        "# Needs Review\n",
        "\n",
        "- [x] **2024-03-01-100000** | Hash: `h1` | [[Journal/d]]\n",
        "  - Category: [projects]\n",
        "  - Original: Fix the leak\n",
        "  - Reason: Unclear\n",
        "\n",
        "- [ ] **2024-03-01-100001** | Hash: `h2` | [[Journal/d]]\n",
        "  - Category: [people/projects/ideas/admin]\n",
        "  - Original: Something vague\n",
        "  - Reason: Unclear\n",
    );

    #[test]
    fn test_parse_checked_item() {
        let parsed = parse_review_document(DOC);
        assert_eq!(
            parsed.items,
            vec![ReviewItem {
                hash: Fingerprint::from_string("h1"),
                category: Category::Projects,
            }]
        );
        let kept = parsed.remaining.join("\n");
        assert!(!kept.contains("h1"));
        assert!(!kept.contains("Fix the leak"));
        assert!(kept.contains("Hash: `h2`"));
        assert!(kept.contains("Something vague"));
    }

    #[test]
    fn test_untouched_placeholder_is_kept() {
        let doc = DOC.replace("- [ ]", "- [X]");
        let parsed = parse_review_document(&doc);
        assert_eq!(parsed.items.len(), 1);
        assert!(parsed.remaining.join("\n").contains("Hash: `h2`"));
    }

    #[test]
    fn test_category_in_original_text_is_ignored() {
        let doc = concat!(
            "- [x] **2024-03-01-100002** | Hash: `h3` | [[Journal/d]]\n",
            "  - Category: [people/projects/ideas/admin]\n",
            "  - Original: Category: admin renewals are due\n",
            "  - Reason: Unclear\n",
        );
        let parsed = parse_review_document(doc);
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.remaining.join("\n"), doc);
    }

    #[test]
    fn test_category_forms() {
        assert_eq!(chosen_category("  - Category: people"), Some(Category::People));
        assert_eq!(chosen_category("  - Category:[Admin]"), Some(Category::Admin));
        assert_eq!(chosen_category("  - Category: [misc]"), None);
        assert_eq!(chosen_category("  - Category: [people/projects/ideas/admin]"), None);
        assert_eq!(chosen_category("  - Original: Category: admin stuff"), None);
        assert_eq!(chosen_category("  - Original: x"), None);
    }

    #[test]
    fn test_checked_without_hash_is_kept() {
        let doc = "- [x] no hash here\n  - Category: ideas";
        let parsed = parse_review_document(doc);
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.remaining.join("\n"), doc);
    }

    #[test]
    fn test_unchanged_document_round_trips() {
        let doc = DOC.replace("- [x]", "- [ ]");
        assert_eq!(parse_review_document(&doc).remaining.join("\n"), doc);
    }
}
