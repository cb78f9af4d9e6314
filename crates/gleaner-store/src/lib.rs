//! Gleaner Storage Layer
//!
//! Implements the `DocumentStore` and `MetadataQuery` traits.
//!
//! # Architecture
//!
//! - `FsStore`: a vault directory on disk, one file per document
//! - `MemoryStore`: an in-memory map with the same semantics, for tests and dry runs
//! - `StoreQuery`: metadata queries answered by scanning any `DocumentStore`
//!
//! Paths are `/`-separated and relative to the store root. Absolute paths and
//! `..` components are rejected.
//!
//! # Examples
//!
//! ```
//! use gleaner_domain::traits::DocumentStore;
//! use gleaner_store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! store.create("People/Mom.md", "---\ntype: person\n---\n# Mom\n").unwrap();
//! assert!(store.exists("People/Mom.md"));
//! assert_eq!(store.list("People").unwrap(), vec!["People/Mom.md"]);
//! ```

#![warn(missing_docs)]

mod fs;
mod memory;
mod query;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use query::StoreQuery;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No document at the path
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A document already exists at the path
    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    /// Path escapes the store or is malformed
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Underlying filesystem failure
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Store path involved
        path: String,
        /// Cause
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by a wrapped store
    #[error("Store error: {0}")]
    Backend(String),
}

/// Check a store path and return its components
pub(crate) fn validate_path(path: &str) -> Result<Vec<&str>, StoreError> {
    if path.starts_with('/') || path.contains('\\') {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    if parts.iter().any(|p| *p == "." || *p == "..") {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

/// Whether `path` lies inside `folder` (the empty folder is the root)
pub(crate) fn in_folder(path: &str, folder: &str) -> bool {
    let folder = folder.trim_matches('/');
    folder.is_empty()
        || path
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert_eq!(validate_path("People/Mom.md").unwrap(), vec!["People", "Mom.md"]);
        assert!(validate_path("/etc/passwd").is_err());
        assert!(validate_path("People/../../x").is_err());
        assert!(validate_path("People\\Mom.md").is_err());
    }

    #[test]
    fn test_in_folder() {
        assert!(in_folder("Inbox-Log/Log-1.md", "Inbox-Log"));
        assert!(in_folder("Inbox-Log/Archive/Log-1.md", "Inbox-Log/"));
        assert!(!in_folder("Inbox-Logs/x.md", "Inbox-Log"));
        assert!(in_folder("anything.md", ""));
    }
}
