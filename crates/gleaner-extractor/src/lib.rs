//! Gleaner Extractor
//!
//! Slices new, capturable free text out of a journal note and splits it into
//! capture entries.
//!
//! # Overview
//!
//! A journal note is a markdown document with an optional metadata header and
//! `## ` sections. Only sections whose heading names a capture area (Journal,
//! Scratch Pad by default) are read; everything else, notably task lists,
//! stays in the note but is never captured. Within a capture section entries
//! are separated by a line holding only the delimiter (`---`).
//!
//! # Architecture
//!
//! ```text
//! Note text + watermark → EntryExtractor → CaptureEntries → dedupe → Classifier
//! ```
//!
//! Extraction is pure: it takes an immutable text snapshot and returns the
//! entries plus a proposed new watermark. The caller decides when to persist
//! the watermark.
//!
//! # Example Usage
//!
//! ```
//! use gleaner_extractor::EntryExtractor;
//!
//! let note = "## Journal\n\nBought milk\n\n---\n\nCalled Mom about the move\n";
//! let extraction = EntryExtractor::default_config().extract(note, 0);
//!
//! let texts: Vec<&str> = extraction.entries.iter().map(|e| e.text.as_str()).collect();
//! assert_eq!(texts, vec!["Bought milk", "Called Mom about the move"]);
//! assert_eq!(extraction.proposed_watermark, note.len());
//! ```

#![warn(missing_docs)]

mod config;
mod dedupe;
mod error;
mod extractor;
mod sections;

pub use config::ExtractorConfig;
pub use dedupe::dedupe;
pub use error::ExtractorError;
pub use extractor::{EntryExtractor, Extraction};
