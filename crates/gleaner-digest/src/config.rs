//! Configuration for the digest and weekly review

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the [`Reporter`](crate::Reporter)
///
/// # Examples
///
/// ```
/// use gleaner_digest::DigestConfig;
///
/// let config = DigestConfig::default();
/// assert_eq!(config.review_days, 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Active projects listed in the daily digest
    pub digest_projects: usize,

    /// People with follow-ups listed in the daily digest
    pub digest_people: usize,

    /// Due admin items listed in the daily digest
    pub digest_tasks: usize,

    /// Days of Inbox Log covered by the weekly review
    pub review_days: u32,

    /// Log entries listed in the weekly review
    pub review_captures: usize,

    /// Open projects listed in the weekly review
    pub review_projects: usize,

    /// Characters of captured text shown when an entry has no record name
    pub capture_chars: usize,

    /// Maximum time for the summarization call, retries included (seconds)
    pub summary_timeout_secs: u64,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            digest_projects: 20,
            digest_people: 10,
            digest_tasks: 10,
            review_days: 7,
            review_captures: 100,
            review_projects: 30,
            capture_chars: 50,
            summary_timeout_secs: 180,
        }
    }
}

impl DigestConfig {
    /// Override the weekly review window
    pub fn with_review_days(mut self, days: u32) -> Self {
        self.review_days = days;
        self
    }

    /// Summarization timeout as a Duration
    pub fn summary_timeout(&self) -> Duration {
        Duration::from_secs(self.summary_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("digest_projects", self.digest_projects),
            ("digest_people", self.digest_people),
            ("digest_tasks", self.digest_tasks),
            ("review_captures", self.review_captures),
            ("review_projects", self.review_projects),
            ("capture_chars", self.capture_chars),
        ] {
            if value == 0 {
                return Err(format!("{} must be greater than 0", name));
            }
        }
        if self.review_days == 0 {
            return Err("review_days must be at least 1".to_string());
        }
        if self.summary_timeout_secs == 0 {
            return Err("summary_timeout_secs must be greater than 0".to_string());
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
