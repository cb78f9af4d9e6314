//! Gleaner Classifier
//!
//! Decides the destination of each capture entry.
//!
//! # Overview
//!
//! For every entry the classifier either honours an explicit override
//! (`@projects: Fix the leak`) or asks the classification service to pick a
//! category. Either way the service extracts the structured fields. The
//! result then passes the confidence gate: anything below the review
//! threshold goes to human review.
//!
//! Classification never fails a run. Service errors, timeouts and malformed
//! replies all degrade to a synthetic `needs_review` result that carries the
//! failure reason.
//!
//! # Architecture
//!
//! ```text
//! Entry → override? → PromptBuilder → LlmProvider → Gatekeeper → ClassificationResult
//! ```
//!
//! # Example Usage
//!
//! ```
//! use gleaner_classifier::{Classifier, ClassifierConfig};
//! use gleaner_domain::Destination;
//! use gleaner_llm::MockProvider;
//!
//! # async fn example() {
//! let llm = MockProvider::new(
//!     r#"{"destination": "ideas", "confidence": 0.2, "data": {"name": "Wat"}}"#,
//! );
//! let classifier = Classifier::new(llm, ClassifierConfig::default());
//!
//! let forced = classifier.classify("@projects: Fix the leak under the sink").await;
//! assert_eq!(forced.destination, Destination::Projects);
//! assert_eq!(forced.confidence, 1.0);
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod override_syntax;
mod prompt;

pub use classifier::Classifier;
pub use config::ClassifierConfig;
pub use error::ClassifierError;
pub use override_syntax::{parse_override, Override};
pub use prompt::PromptBuilder;
