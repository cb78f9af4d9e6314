//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::sections::capturable_sections;
use gleaner_domain::metadata::header_end;
use gleaner_domain::CaptureEntry;
use tracing::debug;

/// Result of extracting a note snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Entries in document order
    pub entries: Vec<CaptureEntry>,

    /// Effective byte offset extraction started from
    pub start_offset: usize,

    /// Watermark to record once the entries are handled: the end of the snapshot
    pub proposed_watermark: usize,
}

/// Splits journal notes into capture entries
pub struct EntryExtractor {
    config: ExtractorConfig,
}

impl EntryExtractor {
    /// Create a new extractor
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self { config })
    }

    /// Create an extractor with default configuration
    pub fn default_config() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the entries at or after `min_offset`
    ///
    /// Extraction never starts inside the metadata header, so a stale or zero
    /// watermark is always safe. Offsets past the end yield no entries; an
    /// offset inside a multi-byte character is moved to the next character.
    pub fn extract(&self, text: &str, min_offset: usize) -> Extraction {
        let body_start = header_end(text).unwrap_or(0);
        let start = ceil_char_boundary(text, body_start.max(min_offset));

        let entries: Vec<CaptureEntry> =
            capturable_sections(text, body_start, start, &self.config.capture_headings)
                .iter()
                .flat_map(|section| self.split_entries(section))
                .map(CaptureEntry::new)
                .collect();

        debug!(
            start_offset = start,
            entries = entries.len(),
            "Extracted capture entries"
        );

        Extraction {
            entries,
            start_offset: start,
            proposed_watermark: text.len(),
        }
    }

    /// Split one section into trimmed, filtered pieces
    fn split_entries(&self, section: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in section.split('\n') {
            if line.trim_end() == self.config.delimiter {
                pieces.push(current.join("\n"));
                current.clear();
            } else {
                current.push(line);
            }
        }
        pieces.push(current.join("\n"));

        pieces
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| self.is_capturable(piece))
            .collect()
    }

    fn is_capturable(&self, piece: &str) -> bool {
        if piece.chars().count() < self.config.min_entry_chars.max(1) {
            return false;
        }
        if piece.starts_with("<!--") && piece.ends_with("-->") {
            return false;
        }
        if self
            .config
            .boilerplate_markers
            .iter()
            .any(|marker| !marker.is_empty() && piece.contains(marker.as_str()))
        {
            return false;
        }
        !starts_with_heading(piece)
    }
}

/// `# ` or `## ` at the start of a piece
fn starts_with_heading(piece: &str) -> bool {
    let Some(rest) = piece.strip_prefix('#') else {
        return false;
    };
    let rest = rest.strip_prefix('#').unwrap_or(rest);
    rest.starts_with(char::is_whitespace)
}

fn ceil_char_boundary(text: &str, mut offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(extraction: &Extraction) -> Vec<&str> {
        extraction.entries.iter().map(|e| e.text.as_str()).collect()
    }

    fn extract(text: &str, offset: usize) -> Extraction {
        EntryExtractor::default_config().extract(text, offset)
    }

    #[test]
    fn test_two_entries() {
        let note = "## Journal\n\nBought milk\n\n---\n\nCalled Mom about the move\n";
        let extraction = extract(note, 0);
        assert_eq!(texts(&extraction), vec!["Bought milk", "Called Mom about the move"]);
        assert_eq!(extraction.entries[0].hash.as_str(), "h6wpldl");
        assert_eq!(extraction.proposed_watermark, note.len());
    }

    #[test]
    fn test_single_piece_without_delimiter() {
        let extraction = extract("## Journal\nJust one longer thought\n", 0);
        assert_eq!(texts(&extraction), vec!["Just one longer thought"]);
    }

    #[test]
    fn test_no_capture_sections() {
        let extraction = extract("## Tasks\n- [ ] Renew passport soon\n", 0);
        assert!(extraction.entries.is_empty());
        assert!(extract("", 0).entries.is_empty());
    }

    #[test]
    fn test_tasks_section_is_skipped() {
        let note =
            "## Tasks\n- [ ] Renew the passport\n\n## Scratch Pad\nLook into standing desks\n";
        assert_eq!(texts(&extract(note, 0)), vec!["Look into standing desks"]);
    }

    #[test]
    fn test_header_is_never_extracted() {
        let note = "---\ntype: daily\n---\n## Journal\nWalked the dog today\n";
        let extraction = extract(note, 0);
        assert_eq!(extraction.start_offset, note.find("## Journal").unwrap());
        assert_eq!(texts(&extraction), vec!["Walked the dog today"]);
    }

    #[test]
    fn test_watermark_skips_processed_text() {
        let first = "## Journal\nBought milk yesterday\n";
        let note = format!("{}---\nCalled Mom about the move\n", first);
        let extraction = extract(&note, first.len());
        assert_eq!(texts(&extraction), vec!["Called Mom about the move"]);
    }

    #[test]
    fn test_watermark_past_end() {
        let note = "## Journal\nBought milk yesterday\n";
        let extraction = extract(note, note.len() + 50);
        assert!(extraction.entries.is_empty());
        assert_eq!(extraction.start_offset, note.len());
    }

    #[test]
    fn test_watermark_inside_multibyte_char() {
        let note = "## Journal\n☕ coffee with Sam at noon\n";
        let inside = note.find('☕').unwrap() + 1;
        let extraction = extract(note, inside);
        assert_eq!(texts(&extraction), vec!["coffee with Sam at noon"]);
    }

    #[test]
    fn test_filters() {
        let note = "## Journal\n\
<!-- New entries below this line -->\n---\n\
short\n---\n\
<!-- just a comment here -->\n---\n\
# Heading piece\n---\n\
Quick Capture area\n---\n\
#hashtag entry that stays\n";
        assert_eq!(texts(&extract(note, 0)), vec!["#hashtag entry that stays"]);
    }

    #[test]
    fn test_minimum_length_boundary() {
        let extractor = EntryExtractor::default_config();
        assert!(extractor.is_capturable("0123456789"));
        assert!(!extractor.is_capturable("012345678"));
    }

    #[test]
    fn test_delimiter_with_trailing_whitespace() {
        let note = "## Journal\nFirst entry here\n---   \nSecond entry here\n";
        assert_eq!(texts(&extract(note, 0)), vec!["First entry here", "Second entry here"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig {
            delimiter: String::new(),
            ..ExtractorConfig::default()
        };
        assert!(EntryExtractor::new(config).is_err());
    }
}
