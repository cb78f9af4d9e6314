//! Configuration for Janitor operations

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Configuration for the Janitor
///
/// # Examples
///
/// ```
/// use gleaner_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.days_to_keep, 90);
/// assert!(!config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// Log documents created more than this many days ago are archived
    pub days_to_keep: u32,

    /// Report what would move without moving anything
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            days_to_keep: 90,
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Override the retention window
    pub fn with_days_to_keep(mut self, days: u32) -> Self {
        self.days_to_keep = days;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// First day that is kept, given today's date
    ///
    /// Logs created strictly before this day are archived.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days_to_keep)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.days_to_keep == 0 {
            return Err("days_to_keep must be at least 1".to_string());
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
