//! Per-document run lock

use crate::error::FilerError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Exclusive lock on processing one source document
///
/// The lock is a file created with `create_new`, so a second run on the same
/// document fails fast instead of filing entries twice. The file is removed
/// when the guard is dropped.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Take the lock for `document` inside `lock_dir`
    pub fn acquire(lock_dir: &Path, document: &str) -> Result<Self, FilerError> {
        fs::create_dir_all(lock_dir).map_err(|source| FilerError::Lock {
            path: lock_dir.to_path_buf(),
            source,
        })?;

        let path = lock_dir.join(lock_file_name(document));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!(lock = %path.display(), "Another run holds the lock");
                return Err(FilerError::Locked(document.to_string()));
            }
            Err(source) => return Err(FilerError::Lock { path, source }),
        };
        // The pid is informational; a failed write still leaves a valid lock
        let _ = writeln!(file, "{}", std::process::id());

        debug!(lock = %path.display(), "Run lock acquired");
        Ok(Self { path })
    }

    /// Lock file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(lock = %self.path.display(), "Failed to release run lock: {}", e);
        }
    }
}

fn lock_file_name(document: &str) -> String {
    let stem: String = document
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}.lock", stem)
}
