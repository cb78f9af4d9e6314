//! Record queries feeding the reports
//!
//! Every query fails open: a folder that cannot be scanned contributes
//! nothing and a warning is logged.

use chrono::NaiveDate;
use gleaner_domain::traits::{DocumentQuery, DocumentStore, MetadataQuery, PageMeta};
use gleaner_domain::{excerpt, Category, FilingStatus, InboxLogEntry, Metadata};
use gleaner_store::StoreQuery;
use std::collections::BTreeMap;
use tracing::warn;

/// Admin statuses that mean the item is finished
const CLOSED_STATUSES: [&str; 4] = ["done", "complete", "completed", "cancelled"];

/// A project and its next step
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLine {
    /// Record name
    pub name: String,
    /// `status` field
    pub status: String,
    /// `next_action` field, or `None specified`
    pub next_action: String,
}

/// A person with outstanding follow-ups
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUp {
    /// Record name
    pub name: String,
    /// `follow_ups` field, flattened to one line
    pub follow_ups: String,
}

/// An open admin item due today or earlier
#[derive(Debug, Clone, PartialEq)]
pub struct DueTask {
    /// Record name
    pub name: String,
    /// Due date
    pub due_date: NaiveDate,
}

/// One capture from the Inbox Log
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureLine {
    /// Destination the entry was filed to
    pub filed_to: String,
    /// Record name, or a short excerpt of the text
    pub label: String,
    /// Whether the entry still waits in the review queue
    pub needs_review: bool,
}

/// Everything the daily digest summarizes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigestInput {
    /// Active projects
    pub projects: Vec<ProjectLine>,
    /// People to follow up with
    pub people: Vec<FollowUp>,
    /// Admin items due
    pub tasks: Vec<DueTask>,
}

impl DigestInput {
    /// Number of records gathered
    pub fn len(&self) -> usize {
        self.projects.len() + self.people.len() + self.tasks.len()
    }

    /// Whether nothing was gathered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the weekly review summarizes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewInput {
    /// Captures logged inside the window, oldest first
    pub captures: Vec<CaptureLine>,
    /// Active, waiting or blocked projects
    pub projects: Vec<ProjectLine>,
}

impl ReviewInput {
    /// Capture count per destination
    pub fn counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for capture in &self.captures {
            *counts.entry(capture.filed_to.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Captures still waiting for review
    pub fn needs_review(&self) -> usize {
        self.captures.iter().filter(|c| c.needs_review).count()
    }
}

/// Scan `folder`, or nothing when it cannot be scanned
fn scan<S: DocumentStore>(store: &S, folder: &str) -> Vec<PageMeta> {
    match StoreQuery::new(store).query(&DocumentQuery::in_folder(folder)) {
        Ok(pages) => pages,
        Err(e) => {
            warn!("Skipping {} in report: {}", folder, e);
            Vec::new()
        }
    }
}

/// Record name: the file name without `.md`
fn record_name(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".md").unwrap_or(file).to_string()
}

fn text_field<'a>(meta: &'a Metadata, key: &str) -> Option<&'a str> {
    meta.get_str(key).map(str::trim).filter(|s| !s.is_empty())
}

fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Projects whose status is one of `statuses`
pub fn projects_with_status<S: DocumentStore>(
    store: &S,
    statuses: &[&str],
    limit: usize,
) -> Vec<ProjectLine> {
    scan(store, Category::Projects.spec().collection)
        .into_iter()
        .filter_map(|page| {
            let status = text_field(&page.metadata, "status")?;
            if !statuses.contains(&status) {
                return None;
            }
            Some(ProjectLine {
                name: record_name(&page.path),
                status: status.to_string(),
                next_action: text_field(&page.metadata, "next_action")
                    .unwrap_or("None specified")
                    .to_string(),
            })
        })
        .take(limit)
        .collect()
}

/// People whose `follow_ups` field is not empty
pub fn people_with_follow_ups<S: DocumentStore>(store: &S, limit: usize) -> Vec<FollowUp> {
    scan(store, Category::People.spec().collection)
        .into_iter()
        .filter_map(|page| {
            let follow_ups = text_field(&page.metadata, "follow_ups")?;
            Some(FollowUp {
                name: record_name(&page.path),
                follow_ups: one_line(follow_ups),
            })
        })
        .take(limit)
        .collect()
}

/// Open admin items due on or before `today`
///
/// Items without a parseable `due_date` never count as due.
pub fn tasks_due<S: DocumentStore>(store: &S, today: NaiveDate, limit: usize) -> Vec<DueTask> {
    scan(store, Category::Admin.spec().collection)
        .into_iter()
        .filter_map(|page| {
            let status = text_field(&page.metadata, "status").unwrap_or("");
            if CLOSED_STATUSES.contains(&status.to_ascii_lowercase().as_str()) {
                return None;
            }
            let due = text_field(&page.metadata, "due_date")?;
            let due_date = NaiveDate::parse_from_str(due, "%Y-%m-%d").ok()?;
            (due_date <= today).then(|| DueTask {
                name: record_name(&page.path),
                due_date,
            })
        })
        .take(limit)
        .collect()
}

/// Inbox Log entries created on or after `since`
pub fn captures_since<S: DocumentStore>(
    store: &S,
    log_folder: &str,
    since: NaiveDate,
    limit: usize,
    label_chars: usize,
) -> Vec<CaptureLine> {
    scan(store, log_folder)
        .iter()
        .filter_map(|page| InboxLogEntry::from_metadata(&page.metadata))
        .filter(|entry| {
            entry
                .created
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .is_some_and(|day| day >= since)
        })
        .take(limit)
        .map(|entry| CaptureLine {
            label: entry
                .destination_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| excerpt(&one_line(&entry.original_text), label_chars)),
            needs_review: entry.status == FilingStatus::NeedsReview,
            filed_to: entry.filed_to,
        })
        .collect()
}
