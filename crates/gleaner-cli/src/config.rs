//! Configuration management for the CLI.
//!
//! One TOML file, `~/.gleaner/config.toml` by default, holds a section per
//! component:
//!
//! ```toml
//! [vault]
//! root = "/home/me/Notes"
//! inbox_log_folder = "Inbox-Log"
//!
//! [llm]
//! model = "llama-3.1-8b-instant"
//!
//! [classifier]
//! review_threshold = 0.6
//!
//! [janitor]
//! days_to_keep = 90
//!
//! [digest]
//! review_days = 7
//!
//! [output]
//! format = "table"
//! ```
//!
//! Every key is optional.

use crate::error::{CliError, Result};
use gleaner_classifier::ClassifierConfig;
use gleaner_digest::DigestConfig;
use gleaner_extractor::ExtractorConfig;
use gleaner_filer::VaultConfig;
use gleaner_janitor::JanitorConfig;
use gleaner_llm::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault location and layout
    pub vault: VaultSection,

    /// Classification service client
    pub llm: LlmConfig,

    /// Entry extraction
    pub extractor: ExtractorConfig,

    /// Classification thresholds
    pub classifier: ClassifierConfig,

    /// Inbox Log archival
    pub janitor: JanitorConfig,

    /// Daily digest and weekly review
    pub digest: DigestConfig,

    /// Output settings
    pub output: Settings,
}

/// `[vault]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSection {
    /// Vault root directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Folder layout inside the vault
    #[serde(flatten)]
    pub layout: VaultConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".gleaner").join("config.toml"))
    }

    /// Load configuration from `path`, or the default path
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("vault", self.vault.layout.validate()),
            ("llm", self.llm.validate()),
            ("extractor", self.extractor.validate()),
            ("classifier", self.classifier.validate()),
            ("janitor", self.janitor.validate()),
            ("digest", self.digest.validate()),
        ];
        for (section, check) in checks {
            check.map_err(|e| CliError::Config(format!("[{}] {}", section, e)))?;
        }

        let budget = self.llm.worst_case_duration();
        let deadlines = [
            (
                "[classifier] classification_timeout_secs",
                self.classifier.classification_timeout(),
            ),
            ("[digest] summary_timeout_secs", self.digest.summary_timeout()),
        ];
        for (name, deadline) in deadlines {
            if deadline <= budget {
                return Err(CliError::Config(format!(
                    "{} must exceed the [llm] retry budget of {}s",
                    name,
                    budget.as_secs()
                )));
            }
        }
        Ok(())
    }

    /// Resolve the vault root, preferring the command-line value
    pub fn vault_root(&self, cli_root: Option<&Path>) -> Result<PathBuf> {
        cli_root
            .map(Path::to_path_buf)
            .or_else(|| self.vault.root.clone())
            .ok_or_else(|| {
                CliError::Config(
                    "No vault configured. Pass --vault or set [vault] root in the config file"
                        .to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.output.color);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert_eq!(config.vault.root, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            "[vault]\nroot = \"/tmp/notes\"\ninbox_log_folder = \"Log\"\n\n[janitor]\ndays_to_keep = 30\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();
        assert_eq!(config.vault.root, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(config.vault.layout.inbox_log_folder, "Log");
        assert_eq!(config.vault.layout.templates_folder, "Templates");
        assert_eq!(config.janitor.days_to_keep, 30);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.llm, LlmConfig::default());
    }

    #[test]
    fn test_invalid_section_reported() {
        let err = Config::from_toml("[janitor]\ndays_to_keep = 0\n").unwrap_err();
        assert!(err.to_string().contains("[janitor]"));
    }

    #[test]
    fn test_timeout_must_cover_retries() {
        let err =
            Config::from_toml("[classifier]\nclassification_timeout_secs = 120\n").unwrap_err();
        assert!(err.to_string().contains("retry budget of 127s"));

        let config = Config::from_toml(
            "[llm]\nmax_retries = 1\nrequest_timeout_secs = 20\n\n[classifier]\nclassification_timeout_secs = 60\n",
        )
        .unwrap();
        assert_eq!(config.classifier.classification_timeout_secs, 60);

        let err = Config::from_toml("[digest]\nsummary_timeout_secs = 30\n").unwrap_err();
        assert!(err.to_string().contains("[digest] summary_timeout_secs"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.vault.root = Some(dir.path().to_path_buf());
        config.output.color = false;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_vault_root_precedence() {
        let mut config = Config::default();
        assert!(config.vault_root(None).is_err());

        config.vault.root = Some(PathBuf::from("/from/config"));
        assert_eq!(config.vault_root(None).unwrap(), PathBuf::from("/from/config"));
        assert_eq!(
            config.vault_root(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
    }
}
