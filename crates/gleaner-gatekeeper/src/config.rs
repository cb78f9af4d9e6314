//! Gatekeeper configuration

use gleaner_domain::REVIEW_THRESHOLD;

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Results with confidence strictly below this go to review
    pub review_threshold: f64,

    /// Reject confidences outside `[0, 1]`
    pub check_confidence_range: bool,

    /// Reject `data` that is present but not an object
    pub require_object_data: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            review_threshold: REVIEW_THRESHOLD,
            check_confidence_range: true,
            require_object_data: true,
        }
    }
}

impl ValidationConfig {
    /// Permissive configuration: shape checks only
    ///
    /// Out-of-range confidences are accepted and non-object `data` reads as
    /// an empty object.
    pub fn permissive() -> Self {
        Self {
            review_threshold: REVIEW_THRESHOLD,
            check_confidence_range: false,
            require_object_data: false,
        }
    }

    /// Strict configuration: all checks, higher review bar
    pub fn strict() -> Self {
        Self {
            review_threshold: 0.75,
            check_confidence_range: true,
            require_object_data: true,
        }
    }

    /// Use a different review threshold
    pub fn with_review_threshold(mut self, threshold: f64) -> Self {
        self.review_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.review_threshold, 0.6);
        assert!(config.check_confidence_range);
    }

    #[test]
    fn test_permissive_config() {
        let config = ValidationConfig::permissive();
        assert!(!config.check_confidence_range);
        assert!(!config.require_object_data);
    }

    #[test]
    fn test_strict_config() {
        assert_eq!(ValidationConfig::strict().review_threshold, 0.75);
    }
}
