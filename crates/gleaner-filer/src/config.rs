//! Vault layout configuration

use serde::{Deserialize, Serialize};

/// Folder names and fixed documents inside the vault
///
/// Category collections (People, Projects, ...) are not configured here; they
/// come from each category's `CategorySpec`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Folder holding one log document per processed entry
    pub inbox_log_folder: String,

    /// Folder for summaries, notices and clarification requests
    pub notifications_folder: String,

    /// Folder holding the category templates
    pub templates_folder: String,

    /// The review checklist document
    pub review_document: String,

    /// Lock file folder, relative to the vault root
    pub lock_folder: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            inbox_log_folder: "Inbox-Log".to_string(),
            notifications_folder: "Notifications".to_string(),
            templates_folder: "Templates".to_string(),
            review_document: "Notifications/Needs-Review.md".to_string(),
            lock_folder: ".gleaner/locks".to_string(),
        }
    }
}

impl VaultConfig {
    /// Where aged log documents are moved
    pub fn archive_folder(&self) -> String {
        format!("{}/Archive", self.inbox_log_folder)
    }

    /// Review document path without its extension, for wiki links
    pub fn review_link(&self) -> &str {
        self.review_document
            .strip_suffix(".md")
            .unwrap_or(&self.review_document)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let folders = [
            ("inbox_log_folder", &self.inbox_log_folder),
            ("notifications_folder", &self.notifications_folder),
            ("templates_folder", &self.templates_folder),
            ("lock_folder", &self.lock_folder),
        ];
        for (name, value) in folders {
            if value.trim_matches('/').is_empty() {
                return Err(format!("{} must not be empty", name));
            }
        }
        if !self.review_document.ends_with(".md") {
            return Err("review_document must be a .md document".to_string());
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
