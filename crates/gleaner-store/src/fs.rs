//! Filesystem-backed store

use crate::{validate_path, StoreError};
use gleaner_domain::traits::DocumentStore;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Document store rooted at a directory on disk
///
/// Hidden files and folders (names starting with `.`) are never listed.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`
    ///
    /// The directory is not required to exist until a document is written.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Store root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute filesystem path for a store path
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let mut full = self.root.clone();
        for part in validate_path(path)? {
            full.push(part);
        }
        Ok(full)
    }

    fn io_error(path: &str, source: std::io::Error) -> StoreError {
        match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
            _ => StoreError::Io {
                path: path.to_string(),
                source,
            },
        }
    }

    fn ensure_parent(&self, full: &Path, path: &str) -> Result<(), StoreError> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(path, e))?;
        }
        Ok(())
    }
}

impl DocumentStore for FsStore {
    type Error = StoreError;

    fn read(&self, path: &str) -> Result<String, Self::Error> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full).map_err(|e| Self::io_error(path, e))
    }

    fn write(&mut self, path: &str, text: &str) -> Result<(), Self::Error> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        fs::write(&full, text).map_err(|e| Self::io_error(path, e))
    }

    fn create(&mut self, path: &str, text: &str) -> Result<(), Self::Error> {
        let full = self.resolve(path)?;
        self.ensure_parent(&full, path)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .map_err(|e| Self::io_error(path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| Self::io_error(path, e))?;
        debug!("Created {}", path);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn list(&self, folder: &str) -> Result<Vec<String>, Self::Error> {
        let dir = self.resolve(folder)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let walker = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
            });

        for entry in walker {
            let entry = entry.map_err(|e| StoreError::Backend(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            paths.push(path);
        }
        paths.sort();
        Ok(paths)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error> {
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        if !source.is_file() {
            return Err(StoreError::NotFound(from.to_string()));
        }
        if target.exists() {
            return Err(StoreError::AlreadyExists(to.to_string()));
        }
        self.ensure_parent(&target, to)?;
        fs::rename(&source, &target).map_err(|e| Self::io_error(from, e))?;
        debug!("Moved {} -> {}", from, to);
        Ok(())
    }
}
