//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the outside
//! world. Infrastructure implementations live in other crates.

use crate::{Metadata, MetadataValue};
use std::future::Future;

/// Hierarchical document store
///
/// Paths are `/`-separated and relative to the store root, e.g.
/// `People/Mom.md`. The first path component doubles as the category a
/// record belongs to.
///
/// Implemented by the infrastructure layer (gleaner-store)
pub trait DocumentStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Read a document
    fn read(&self, path: &str) -> Result<String, Self::Error>;

    /// Overwrite an existing document
    fn write(&mut self, path: &str, text: &str) -> Result<(), Self::Error>;

    /// Create a new document, failing if it already exists
    fn create(&mut self, path: &str, text: &str) -> Result<(), Self::Error>;

    /// Whether a document exists at `path`
    fn exists(&self, path: &str) -> bool;

    /// List document paths under `folder`, recursively, in sorted order
    ///
    /// A missing folder lists as empty.
    fn list(&self, folder: &str) -> Result<Vec<String>, Self::Error>;

    /// Move a document, creating parent folders as needed
    fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error>;
}

/// Declarative query over document metadata
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    /// Folder to search (recursively)
    pub folder: String,

    /// Fields that must be present with exactly these values
    pub field_equals: Vec<(String, MetadataValue)>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl DocumentQuery {
    /// Query every document in `folder`
    pub fn in_folder(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    /// Require `key` to equal `value`
    pub fn where_eq(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.field_equals.push((key.into(), value.into()));
        self
    }

    /// Stop after `limit` matches
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `meta` satisfies the field filters
    pub fn matches(&self, meta: &Metadata) -> bool {
        self.field_equals
            .iter()
            .all(|(key, value)| meta.get(key) == Some(value))
    }
}

/// A document's path and parsed metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    /// Document path
    pub path: String,

    /// Parsed header
    pub metadata: Metadata,
}

/// Trait for metadata queries over the store
///
/// Implemented by the infrastructure layer (gleaner-store)
pub trait MetadataQuery {
    /// Error type for query operations
    type Error: std::fmt::Display;

    /// Run a query
    fn query(&self, query: &DocumentQuery) -> Result<Vec<PageMeta>, Self::Error>;
}

/// Trait for the remote classification service
///
/// Implemented by the infrastructure layer (gleaner-llm)
pub trait LlmProvider {
    /// Error type for provider operations
    type Error: std::fmt::Display;

    /// Send a single-turn prompt and return the raw reply text
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_matches_fields() {
        let meta = Metadata::parse("entry_hash: h1\nstatus: filed");
        let query = DocumentQuery::in_folder("Inbox-Log").where_eq("entry_hash", "h1");
        assert!(query.matches(&meta));
        assert!(!query.where_eq("status", "merged").matches(&meta));
        assert!(DocumentQuery::in_folder("x").matches(&Metadata::new()));
    }
}
