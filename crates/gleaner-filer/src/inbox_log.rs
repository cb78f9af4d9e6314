//! Inbox Log: one document per processed entry

use crate::clock::Stamp;
use crate::error::FilerError;
use crate::unique_path;
use gleaner_domain::metadata::compose_document;
use gleaner_domain::traits::{DocumentQuery, DocumentStore, MetadataQuery};
use gleaner_domain::{FilingStatus, Fingerprint, InboxLogEntry};
use gleaner_store::StoreQuery;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Write `entry` as a new log document and return its path
///
/// Successful entries are named `Log-<stamp>-<hash>`, failures
/// `Error-<stamp>-<hash>`.
pub fn write_entry<S: DocumentStore>(
    store: &mut S,
    folder: &str,
    entry: &InboxLogEntry,
    stamp: &Stamp,
) -> Result<String, FilerError> {
    let prefix = match entry.status {
        FilingStatus::Error => "Error",
        _ => "Log",
    };
    let stem = format!("{}/{}-{}-{}", folder, prefix, stamp.file(), entry.entry_hash);
    let path = unique_path(store, &stem);

    let doc = compose_document(&entry.to_metadata(), &render_body(entry));
    store.create(&path, &doc).map_err(FilerError::store)?;
    debug!(path = %path, status = %entry.status, "Inbox log entry written");
    Ok(path)
}

fn render_body(entry: &InboxLogEntry) -> String {
    let quoted: Vec<String> = entry.original_text.lines().map(|l| format!("> {}", l)).collect();
    let mut body = String::new();

    match entry.status {
        FilingStatus::Error => body.push_str("# Error Processing Entry\n\n"),
        _ => body.push_str("# Inbox Log\n\n"),
    }
    body.push_str(&format!("**Original Text:**\n{}\n\n", quoted.join("\n")));

    match (&entry.destination_name, &entry.destination_path) {
        (Some(name), Some(path)) => body.push_str(&format!(
            "**Filed to:** {} as [[{}|{}]]\n",
            entry.filed_to,
            path.strip_suffix(".md").unwrap_or(path),
            name
        )),
        _ => body.push_str(&format!("**Filed to:** {}\n", entry.filed_to)),
    }
    body.push_str(&format!(
        "**Confidence:** {}\n**Status:** {}\n**Source:** [[{}]]\n",
        entry.confidence, entry.status, entry.source_note
    ));
    if let Some(message) = &entry.error_message {
        body.push_str(&format!("\n**Error:**\n```\n{}\n```\n", message));
    }
    body
}

/// Every fingerprint recorded in the log, archive included
///
/// Fails open: when the log cannot be scanned the set is empty and a warning
/// is logged.
pub fn known_hashes<S: DocumentStore>(store: &S, folder: &str) -> HashSet<Fingerprint> {
    match StoreQuery::new(store).query(&DocumentQuery::in_folder(folder)) {
        Ok(pages) => pages
            .iter()
            .filter_map(|page| page.metadata.get_str("entry_hash"))
            .map(Fingerprint::from_string)
            .collect(),
        Err(e) => {
            warn!("Inbox log unreadable, deduplicating against nothing: {}", e);
            HashSet::new()
        }
    }
}

/// First decodable log entry for `hash`, by linear scan
pub fn find_by_hash<S: DocumentStore>(
    store: &S,
    folder: &str,
    hash: &Fingerprint,
) -> Option<InboxLogEntry> {
    let query = DocumentQuery::in_folder(folder).where_eq("entry_hash", hash.as_str());
    match StoreQuery::new(store).query(&query) {
        Ok(pages) => pages
            .iter()
            .find_map(|page| InboxLogEntry::from_metadata(&page.metadata)),
        Err(e) => {
            warn!("Inbox log unreadable while looking up {}: {}", hash, e);
            None
        }
    }
}
