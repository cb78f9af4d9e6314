//! Configuration for the Classifier

use gleaner_domain::REVIEW_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Results with confidence strictly below this go to review
    pub review_threshold: f64,

    /// Confidence assigned to `@category:` overrides
    pub override_confidence: f64,

    /// Confidence assigned when a reviewer picks the category
    pub reconcile_confidence: f64,

    /// Maximum time for a single classification call, retries included (seconds)
    pub classification_timeout_secs: u64,

    /// Characters of original text kept on synthetic review results
    pub review_excerpt_chars: usize,
}

impl ClassifierConfig {
    /// Get the classification timeout as a Duration
    pub fn classification_timeout(&self) -> Duration {
        Duration::from_secs(self.classification_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("review_threshold", self.review_threshold),
            ("override_confidence", self.override_confidence),
            ("reconcile_confidence", self.reconcile_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0.0 and 1.0", name));
            }
        }
        if self.override_confidence < self.review_threshold {
            return Err("override_confidence must not be below review_threshold".to_string());
        }
        if self.reconcile_confidence < self.review_threshold {
            return Err("reconcile_confidence must not be below review_threshold".to_string());
        }
        if self.classification_timeout_secs == 0 {
            return Err("classification_timeout_secs must be greater than 0".to_string());
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

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            review_threshold: REVIEW_THRESHOLD,
            override_confidence: 1.0,
            reconcile_confidence: 0.95,
            classification_timeout_secs: 180,
            review_excerpt_chars: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.review_threshold, 0.6);
    }

    #[test]
    fn test_override_below_threshold_rejected() {
        let config = ClassifierConfig {
            override_confidence: 0.5,
            ..ClassifierConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = ClassifierConfig {
            review_threshold: 1.2,
            ..ClassifierConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClassifierConfig::default();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(ClassifierConfig::from_toml(&toml_str).unwrap(), config);
    }
}
