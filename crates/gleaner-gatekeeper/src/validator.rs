//! Classifier reply validation

use crate::{ValidationConfig, ValidationError};
use gleaner_domain::{ClassificationResult, Destination};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// The Gatekeeper validates classifier replies before anything is filed
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Parse and check a raw reply
    ///
    /// The reply must be a JSON object with a known `destination`, a numeric
    /// `confidence` and a non-null `data`. Nothing is coerced: a confidence
    /// sent as the string `"0.9"` is rejected.
    pub fn validate(&self, raw: &str) -> Result<ClassificationResult, ValidationError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(mut obj) = value else {
            return Err(ValidationError::Parse("expected a JSON object".to_string()));
        };

        let destination = match obj.get("destination") {
            Some(Value::String(s)) if !s.is_empty() => Destination::parse(s)
                .ok_or_else(|| ValidationError::UnknownDestination(s.clone()))?,
            _ => return Err(ValidationError::MissingDestination),
        };

        let confidence = obj
            .get("confidence")
            .and_then(Value::as_f64)
            .ok_or(ValidationError::MissingConfidence)?;
        if self.config.check_confidence_range && !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::ConfidenceOutOfRange(confidence));
        }

        let data = match obj.remove("data") {
            None | Some(Value::Null) => return Err(ValidationError::MissingData),
            Some(Value::Object(map)) => map,
            Some(_) if self.config.require_object_data => {
                return Err(ValidationError::DataNotObject)
            }
            Some(_) => Map::new(),
        };

        debug!(destination = %destination, confidence, "Classifier reply validated");
        Ok(ClassificationResult::new(destination, confidence, data))
    }

    /// Route a low-confidence result to review
    ///
    /// Returns true when the destination was changed.
    pub fn gate(&self, result: &mut ClassificationResult) -> bool {
        let original = result.destination;
        let demoted = result.gate(self.config.review_threshold);
        if demoted {
            info!(
                "Confidence {:.2} below {:.2}, routing {} to review",
                result.confidence, self.config.review_threshold, original
            );
        }
        demoted
    }
}
