//! Deduplication against already-logged fingerprints

use gleaner_domain::{CaptureEntry, Fingerprint};
use std::collections::HashSet;

/// Drop entries whose fingerprint is already known
///
/// Pure filter. Repeats inside `entries` are also dropped, keeping the first
/// occurrence, so one run never files the same text twice.
pub fn dedupe(
    entries: Vec<CaptureEntry>,
    known_hashes: &HashSet<Fingerprint>,
) -> Vec<CaptureEntry> {
    let mut seen: HashSet<Fingerprint> = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| !known_hashes.contains(&entry.hash) && seen.insert(entry.hash.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hashes_removed() {
        let entries = vec![CaptureEntry::new("Bought milk"), CaptureEntry::new("Called Mom")];
        let known: HashSet<_> = [Fingerprint::of("Bought milk")].into_iter().collect();

        let fresh = dedupe(entries, &known);
        assert_eq!(fresh, vec![CaptureEntry::new("Called Mom")]);
    }

    #[test]
    fn test_repeats_within_batch() {
        let entries = vec![
            CaptureEntry::new("same text"),
            CaptureEntry::new("other text"),
            CaptureEntry::new("same text"),
        ];
        let fresh = dedupe(entries, &HashSet::new());
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].text, "same text");
        assert_eq!(fresh[1].text, "other text");
    }

    #[test]
    fn test_second_run_after_logging_is_empty() {
        let entries = vec![CaptureEntry::new("Bought milk"), CaptureEntry::new("Called Mom")];
        let first = dedupe(entries.clone(), &HashSet::new());
        let logged: HashSet<_> = first.iter().map(|e| e.hash.clone()).collect();
        assert!(dedupe(entries, &logged).is_empty());
    }
}
