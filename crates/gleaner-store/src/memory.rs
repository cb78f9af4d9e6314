//! In-memory store

use crate::{in_folder, validate_path, StoreError};
use gleaner_domain::traits::DocumentStore;
use std::collections::BTreeMap;

/// Document store held in memory
///
/// Same semantics as [`FsStore`](crate::FsStore): `create` refuses to
/// overwrite, `write` refuses to create.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given documents
    pub fn with_documents<I, P, T>(documents: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: Into<String>,
    {
        Self {
            documents: documents
                .into_iter()
                .map(|(p, t)| (p.into(), t.into()))
                .collect(),
        }
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate over `(path, text)` pairs in path order
    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().map(|(p, t)| (p.as_str(), t.as_str()))
    }

    fn key(path: &str) -> Result<String, StoreError> {
        Ok(validate_path(path)?.join("/"))
    }
}

impl DocumentStore for MemoryStore {
    type Error = StoreError;

    fn read(&self, path: &str) -> Result<String, Self::Error> {
        self.documents
            .get(&Self::key(path)?)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn write(&mut self, path: &str, text: &str) -> Result<(), Self::Error> {
        match self.documents.get_mut(&Self::key(path)?) {
            Some(doc) => {
                *doc = text.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    fn create(&mut self, path: &str, text: &str) -> Result<(), Self::Error> {
        let key = Self::key(path)?;
        if self.documents.contains_key(&key) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        self.documents.insert(key, text.to_string());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        Self::key(path)
            .map(|k| self.documents.contains_key(&k))
            .unwrap_or(false)
    }

    fn list(&self, folder: &str) -> Result<Vec<String>, Self::Error> {
        let folder = Self::key(folder)?;
        Ok(self
            .documents
            .keys()
            .filter(|path| in_folder(path, &folder))
            .cloned()
            .collect())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error> {
        let from_key = Self::key(from)?;
        let to_key = Self::key(to)?;
        if self.documents.contains_key(&to_key) {
            return Err(StoreError::AlreadyExists(to.to_string()));
        }
        let text = self
            .documents
            .remove(&from_key)
            .ok_or_else(|| StoreError::NotFound(from.to_string()))?;
        self.documents.insert(to_key, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_refuses_overwrite() {
        let mut store = MemoryStore::new();
        store.create("Ideas/Garden.md", "a").unwrap();
        assert!(matches!(
            store.create("Ideas/Garden.md", "b"),
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.read("Ideas/Garden.md").unwrap(), "a");
    }

    #[test]
    fn test_write_requires_existing() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.write("x.md", "b"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_list_is_recursive_and_sorted() {
        let store = MemoryStore::with_documents([
            ("Inbox-Log/Log-b.md", ""),
            ("Inbox-Log/Archive/Log-a.md", ""),
            ("Inbox-Logger/other.md", ""),
            ("People/Mom.md", ""),
        ]);
        assert_eq!(
            store.list("Inbox-Log").unwrap(),
            vec!["Inbox-Log/Archive/Log-a.md", "Inbox-Log/Log-b.md"]
        );
        assert!(store.list("Missing").unwrap().is_empty());
        assert_eq!(store.list("").unwrap().len(), 4);
    }

    #[test]
    fn test_rename() {
        let mut store = MemoryStore::with_documents([("a.md", "x"), ("b.md", "y")]);
        assert!(matches!(store.rename("a.md", "b.md"), Err(StoreError::AlreadyExists(_))));
        store.rename("a.md", "Archive/a.md").unwrap();
        assert!(!store.exists("a.md"));
        assert_eq!(store.read("Archive/a.md").unwrap(), "x");
    }
}
