//! Capture entries

use crate::Fingerprint;

/// One atomic unit of captured free text
///
/// Entries are derived fresh from the source document on every run and are
/// never persisted on their own; everything downstream refers to them by
/// [`Fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEntry {
    /// Trimmed entry text
    pub text: String,

    /// Fingerprint of `text`
    pub hash: Fingerprint,
}

impl CaptureEntry {
    /// Create an entry, fingerprinting the text as given
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = Fingerprint::of(&text);
        Self { text, hash }
    }
}
