//! Metadata queries by scanning

use crate::StoreError;
use gleaner_domain::metadata::split_document;
use gleaner_domain::traits::{DocumentQuery, DocumentStore, MetadataQuery, PageMeta};
use tracing::warn;

/// Answers metadata queries by reading every document in the folder
///
/// There is no index: each query is a linear scan. Documents that cannot be
/// read are skipped with a warning.
pub struct StoreQuery<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> StoreQuery<'a, S> {
    /// Query over `store`
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: DocumentStore> MetadataQuery for StoreQuery<'_, S> {
    type Error = StoreError;

    fn query(&self, query: &DocumentQuery) -> Result<Vec<PageMeta>, Self::Error> {
        let paths = self
            .store
            .list(&query.folder)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut pages = Vec::new();
        for path in paths {
            if query.limit.is_some_and(|limit| pages.len() >= limit) {
                break;
            }
            let text = match self.store.read(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable document {}: {}", path, e);
                    continue;
                }
            };
            let (metadata, _) = split_document(&text);
            if query.matches(&metadata) {
                pages.push(PageMeta { path, metadata });
            }
        }
        Ok(pages)
    }
}
