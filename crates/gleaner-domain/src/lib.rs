//! Gleaner Domain Layer
//!
//! This crate contains the core vocabulary of the capture pipeline. It keeps
//! external dependencies to a minimum and defines the value objects and trait
//! interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Capture Entry**: one atomic unit of free text lifted out of a journal note
//! - **Fingerprint**: deterministic short id of an entry's exact text, the only dedupe key
//! - **Destination**: one of five classification outcomes, four of which are record categories
//! - **Metadata**: the `key: value` header block carried by every document in the vault
//! - **Watermark**: byte offset marking already-processed content of a source note
//! - **Inbox Log**: append-only audit trail, one entry per processed capture
//!
//! ## Architecture
//!
//! - Pure logic only, no I/O
//! - Infrastructure (HTTP classifier, filesystem store) lives in other crates
//! - Trait definitions for all external interactions live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classification;
pub mod destination;
pub mod entry;
pub mod fingerprint;
pub mod inbox;
pub mod metadata;
pub mod traits;
pub mod watermark;

// Re-exports for convenience
pub use classification::{excerpt, ClassificationResult, REVIEW_THRESHOLD};
pub use destination::{Category, CategorySpec, Destination, FieldSpec, MergeRule};
pub use entry::CaptureEntry;
pub use fingerprint::Fingerprint;
pub use inbox::{FilingStatus, InboxLogEntry};
pub use metadata::{Metadata, MetadataValue};
pub use watermark::Watermark;
