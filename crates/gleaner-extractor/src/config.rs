//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Pieces shorter than this many characters are dropped
    pub min_entry_chars: usize,

    /// `## ` headings (case- and whitespace-insensitive prefixes) whose
    /// sections are captured
    pub capture_headings: Vec<String>,

    /// Line content separating entries
    pub delimiter: String,

    /// Pieces containing any of these markers are template boilerplate
    pub boilerplate_markers: Vec<String>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.delimiter.trim().is_empty() {
            return Err("delimiter must not be empty".to_string());
        }
        if self.delimiter.contains('\n') {
            return Err("delimiter must be a single line".to_string());
        }
        if self.capture_headings.iter().all(|h| h.trim().is_empty()) {
            return Err("capture_headings must name at least one section".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_entry_chars: 10,
            capture_headings: vec!["Journal".to_string(), "Scratch Pad".to_string()],
            delimiter: "---".to_string(),
            boilerplate_markers: vec![
                "New entries below this line".to_string(),
                "Quick Capture".to_string(),
            ],
        }
    }
}
