//! Gleaner Gatekeeper
//!
//! Validates classifier replies and applies the confidence gate.
//!
//! The Gatekeeper provides:
//! - Strict shape validation of the raw reply (no coercion)
//! - Confidence range checking
//! - Routing of low-confidence results to human review
//!
//! # Examples
//!
//! ```
//! use gleaner_domain::Destination;
//! use gleaner_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//!
//! let mut result = gatekeeper
//!     .validate(r#"{"destination": "ideas", "confidence": 0.4, "data": {"name": "x"}}"#)
//!     .unwrap();
//! assert!(gatekeeper.gate(&mut result));
//! assert_eq!(result.destination, Destination::NeedsReview);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::ValidationError;
pub use validator::Gatekeeper;
