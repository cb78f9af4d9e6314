//! Processing watermark stored on a source document

use crate::{Metadata, MetadataValue};

/// Metadata key holding the processed byte offset
pub const OFFSET_KEY: &str = "last_processed_offset";

/// Metadata key holding the time of the last completed run
pub const STAMP_KEY: &str = "last_processed";

/// How far into a source document processing has already gone
///
/// The offset is a byte index into the full document text, header included.
/// It only ever moves forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watermark {
    /// Byte offset of the first unprocessed character
    pub last_processed_offset: usize,

    /// Local timestamp of the run that set the offset
    pub last_processed: Option<String>,
}

impl Watermark {
    /// Read the watermark from a document's metadata
    ///
    /// Missing, negative or malformed offsets read as zero.
    pub fn from_metadata(meta: &Metadata) -> Self {
        let offset = match meta.get(OFFSET_KEY) {
            Some(value) => value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
                .filter(|n| n.is_finite() && *n > 0.0)
                .map(|n| n as usize)
                .unwrap_or(0),
            None => 0,
        };
        Self {
            last_processed_offset: offset,
            last_processed: meta.get_str(STAMP_KEY).map(str::to_string),
        }
    }

    /// Write the watermark into a document's metadata
    pub fn write_to(&self, meta: &mut Metadata) {
        for (key, value) in self.header_updates() {
            meta.insert(key, value);
        }
    }

    /// The header keys this watermark sets, for in-place header edits
    pub fn header_updates(&self) -> Vec<(&'static str, MetadataValue)> {
        let offset = MetadataValue::Number(self.last_processed_offset as f64);
        let mut updates = vec![(OFFSET_KEY, offset)];
        if let Some(stamp) = &self.last_processed {
            updates.push((STAMP_KEY, MetadataValue::Text(stamp.clone())));
        }
        updates
    }

    /// Move the watermark to `offset`, never backwards
    ///
    /// The timestamp is always refreshed since a run did complete.
    pub fn advance(&mut self, offset: usize, stamp: impl Into<String>) {
        self.last_processed_offset = self.last_processed_offset.max(offset);
        self.last_processed = Some(stamp.into());
    }
}
