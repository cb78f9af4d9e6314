//! Classification results

use crate::Destination;
use serde_json::{Map, Value};

/// Confidence below which a result is routed to human review
///
/// The comparison is strict: a result at exactly this value is filed.
pub const REVIEW_THRESHOLD: f64 = 0.6;

/// Outcome of classifying one capture entry
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Where the entry goes
    pub destination: Destination,

    /// Classifier confidence in `[0, 1]`
    pub confidence: f64,

    /// Structured fields extracted for the destination
    pub data: Map<String, Value>,
}

impl ClassificationResult {
    /// Create a new result
    pub fn new(destination: Destination, confidence: f64, data: Map<String, Value>) -> Self {
        Self {
            destination,
            confidence,
            data,
        }
    }

    /// Synthetic review result for an entry whose classification failed
    ///
    /// Carries the reason and the first `excerpt_chars` characters of the text
    /// so the review artifact has something to show.
    pub fn needs_review(text: &str, reason: impl Into<String>, excerpt_chars: usize) -> Self {
        let mut data = Map::new();
        data.insert(
            "original_text".to_string(),
            Value::String(text.chars().take(excerpt_chars).collect()),
        );
        data.insert(
            "possible_categories".to_string(),
            Value::Array(vec![Value::String("unknown".to_string())]),
        );
        data.insert("reason".to_string(), Value::String(reason.into()));
        Self::new(Destination::NeedsReview, 0.0, data)
    }

    /// Force the destination to `needs_review` when confidence is below `threshold`
    ///
    /// Returns true when the destination was changed.
    pub fn gate(&mut self, threshold: f64) -> bool {
        if self.confidence < threshold && self.destination != Destination::NeedsReview {
            self.destination = Destination::NeedsReview;
            return true;
        }
        false
    }

    /// Get a string field from `data`
    ///
    /// Numbers and booleans are rendered as text; null and empty strings are
    /// treated as absent.
    pub fn text_field(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Display name the classifier gave the record
    pub fn name(&self) -> Option<String> {
        self.text_field("name")
    }

    /// Tags from `data.tags`, ignoring non-string items
    pub fn tags(&self) -> Vec<String> {
        match self.data.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Review reason, if any
    pub fn reason(&self) -> Option<String> {
        self.text_field("reason")
    }

    /// Categories the classifier was torn between
    pub fn possible_categories(&self) -> Vec<String> {
        match self.data.get("possible_categories") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(destination: Destination, confidence: f64, data: Value) -> ClassificationResult {
        let data = data.as_object().cloned().unwrap_or_default();
        ClassificationResult::new(destination, confidence, data)
    }

    #[test]
    fn test_gate_below_threshold() {
        let mut r = result(Destination::Ideas, 0.59, json!({}));
        assert!(r.gate(REVIEW_THRESHOLD));
        assert_eq!(r.destination, Destination::NeedsReview);
    }

    #[test]
    fn test_gate_at_threshold_is_kept() {
        let mut r = result(Destination::Ideas, 0.6, json!({}));
        assert!(!r.gate(REVIEW_THRESHOLD));
        assert_eq!(r.destination, Destination::Ideas);
    }

    #[test]
    fn test_needs_review_result() {
        let text = "x".repeat(300);
        let r = ClassificationResult::needs_review(&text, "API or validation error: boom", 200);
        assert_eq!(r.destination, Destination::NeedsReview);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.text_field("original_text").unwrap().len(), 200);
        assert_eq!(r.possible_categories(), vec!["unknown"]);
        assert_eq!(r.reason().unwrap(), "API or validation error: boom");
    }

    #[test]
    fn test_field_accessors() {
        let r = result(
            Destination::People,
            0.9,
            json!({"name": "Mom", "tags": ["family", 3], "context": "", "due_date": null}),
        );
        assert_eq!(r.name().as_deref(), Some("Mom"));
        assert_eq!(r.tags(), vec!["family"]);
        assert_eq!(r.text_field("context"), None);
        assert_eq!(r.text_field("due_date"), None);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("héllo wörld", 5), "héllo...");
    }
}
