//! Wiring the configured components onto a vault directory.

use crate::config::Config;
use crate::error::{CliError, Result};
use gleaner_classifier::Classifier;
use gleaner_digest::Reporter;
use gleaner_extractor::EntryExtractor;
use gleaner_filer::{Pipeline, RecordFiler};
use gleaner_llm::{ChatCompletionsProvider, Credential};
use gleaner_store::FsStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An opened vault and the configuration it runs under
pub struct Vault {
    root: PathBuf,
    config: Config,
}

impl Vault {
    /// Open the vault at `root`
    pub fn open(root: PathBuf, config: Config) -> Result<Self> {
        if !root.is_dir() {
            return Err(CliError::Config(format!(
                "Vault root {} is not a directory",
                root.display()
            )));
        }
        debug!("Using vault at {}", root.display());
        Ok(Self { root, config })
    }

    /// Vault root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store over the vault directory
    pub fn store(&self) -> FsStore {
        FsStore::new(&self.root)
    }

    /// Filer over the vault directory
    pub fn filer(&self) -> Result<RecordFiler<FsStore>> {
        Ok(RecordFiler::new(self.store(), self.config.vault.layout.clone())?)
    }

    /// Extractor with the configured rules
    pub fn extractor(&self) -> Result<EntryExtractor> {
        EntryExtractor::new(self.config.extractor.clone())
            .map_err(|e| CliError::Config(format!("[extractor] {}", e)))
    }

    /// Client for the hosted classification service
    ///
    /// The API key file is resolved against the vault root.
    pub fn provider(&self) -> Result<ChatCompletionsProvider> {
        let llm = &self.config.llm;
        let credential = Credential::load(&self.root.join(&llm.api_key_file), &llm.api_key_var);
        Ok(ChatCompletionsProvider::new(llm.clone(), credential)?)
    }

    /// Full pipeline against the hosted classification service
    pub fn pipeline(&self) -> Result<Pipeline<FsStore, ChatCompletionsProvider>> {
        let classifier = Classifier::new(self.provider()?, self.config.classifier.clone());

        Ok(Pipeline::new(self.filer()?, classifier, self.extractor()?)
            .with_lock_dir(self.root.join(&self.config.vault.layout.lock_folder)))
    }

    /// Report writer for the digest and weekly review
    pub fn reporter(&self) -> Result<Reporter<ChatCompletionsProvider>> {
        Ok(Reporter::new(self.provider()?, self.config.digest.clone())?)
    }

    /// Turn a note argument into a vault-relative document path
    ///
    /// Accepts a path relative to the vault root or an absolute path inside
    /// it. Separators are normalized to `/`.
    pub fn note_path(&self, note: &str) -> Result<String> {
        let path = Path::new(note);
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root).map_err(|_| {
                CliError::InvalidInput(format!(
                    "{} is outside the vault {}",
                    note,
                    self.root.display()
                ))
            })?
        } else {
            path
        };

        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            return Err(CliError::InvalidInput("Note path is empty".to_string()));
        }
        Ok(parts.join("/"))
    }
}
