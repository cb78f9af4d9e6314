//! Fingerprint module - content-addressed identity for capture entries

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Short deterministic identifier derived from an entry's exact text
///
/// Computed with 32-bit FNV-1a over the UTF-16 code units of the text and
/// rendered as `h` followed by the base-36 digest. Order-, case- and
/// whitespace-sensitive. Not a cryptographic hash: collisions are rare but
/// possible.
///
/// # Examples
///
/// ```
/// use gleaner_domain::Fingerprint;
///
/// let a = Fingerprint::of("Bought milk");
/// assert_eq!(a, Fingerprint::of("Bought milk"));
/// assert_ne!(a, Fingerprint::of("bought milk"));
/// assert!(a.as_str().starts_with('h'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint the given text
    pub fn of(text: &str) -> Self {
        let mut hash = FNV_OFFSET_BASIS;
        for unit in text.encode_utf16() {
            hash ^= u32::from(unit);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self(format!("h{}", to_base36(hash)))
    }

    /// Wrap an already-computed fingerprint (e.g. read back from a log)
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the fingerprint as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
