//! Metadata codec
//!
//! Every document in the vault may start with a metadata header:
//!
//! ```text
//! ---
//! confidence: 0.9
//! tags: [family, move]
//! context: |
//!   Called about the move
//!   - Asked about boxes
//! ---
//! body...
//! ```
//!
//! The grammar is deliberately small and is not YAML:
//!
//! - one `key: value` per line, split at the first `:`
//! - `key: |` starts a multi-line text value; continuation lines are indented
//!   by two spaces and the block ends at the first line that is not
//! - scalars are `null`, `true`/`false`, finite numbers, `[a, b]` lists of
//!   strings, double-quoted JSON strings, or bare text
//!
//! [`Metadata::serialize`] quotes any text that would read back as something
//! else, so `parse(serialize(m)) == m` for every representable map.

use std::fmt;

/// Marker line opening and closing a metadata header
pub const HEADER_MARKER: &str = "---";

/// One metadata value
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    /// `null`, `~` or an empty value
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A finite number
    Number(f64),
    /// Single- or multi-line text
    Text(String),
    /// `[a, b, c]`
    List(Vec<String>),
}

impl MetadataValue {
    /// Text content, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// List items, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetadataValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, MetadataValue::Null)
    }

    /// Convert a JSON value from a classifier payload
    ///
    /// Arrays keep only their scalar items; objects are stored as JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => MetadataValue::Null,
            Value::Bool(b) => MetadataValue::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(MetadataValue::Number)
                .unwrap_or(MetadataValue::Null),
            Value::String(s) => MetadataValue::Text(s.clone()),
            Value::Array(items) => MetadataValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Object(_) => MetadataValue::Text(value.to_string()),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Null => f.write_str("null"),
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Number(n) => write!(f, "{}", n),
            MetadataValue::Text(s) => f.write_str(s),
            MetadataValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::Number(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(items: Vec<String>) -> Self {
        MetadataValue::List(items)
    }
}

/// Ordered metadata map
///
/// Keys keep their first-insertion order so rewriting a document leaves its
/// header layout stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetadataValue)>,
}

impl Metadata {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a text value by key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_str)
    }

    /// Get a numeric value by key
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(MetadataValue::as_f64)
    }

    /// Insert a value, replacing an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the lines between the header markers
    ///
    /// Lines that are not `key: value` pairs are ignored. A repeated key
    /// keeps its last value.
    pub fn parse(block: &str) -> Self {
        let mut meta = Metadata::new();
        let mut open_block: Option<(String, Vec<String>, usize)> = None;

        for raw in block.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if let Some((_, lines, pending_blank)) = open_block.as_mut() {
                if let Some(rest) = line.strip_prefix("  ") {
                    lines.extend(std::iter::repeat(String::new()).take(*pending_blank));
                    *pending_blank = 0;
                    lines.push(rest.to_string());
                    continue;
                }
                if line.trim().is_empty() {
                    *pending_blank += 1;
                    continue;
                }
                if let Some((key, lines, _)) = open_block.take() {
                    meta.insert(key, MetadataValue::Text(lines.join("\n")));
                }
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = value.trim();
            if value == "|" {
                open_block = Some((key.to_string(), Vec::new(), 0));
            } else {
                meta.insert(key, parse_scalar(value));
            }
        }

        if let Some((key, lines, _)) = open_block {
            meta.insert(key, MetadataValue::Text(lines.join("\n")));
        }
        meta
    }

    /// Serialize to header lines (without the markers)
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            match value {
                MetadataValue::Text(text) if text.contains('\n') => {
                    out.push_str(key);
                    out.push_str(": |\n");
                    for line in text.split('\n') {
                        out.push_str("  ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                _ => {
                    out.push_str(key);
                    out.push_str(": ");
                    out.push_str(&render_scalar(value));
                    out.push('\n');
                }
            }
        }
        out
    }
}

impl FromIterator<(String, MetadataValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, MetadataValue)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}

fn parse_scalar(value: &str) -> MetadataValue {
    match value {
        "" | "null" | "~" => return MetadataValue::Null,
        "true" => return MetadataValue::Bool(true),
        "false" => return MetadataValue::Bool(false),
        _ => {}
    }

    if value.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
        if let Ok(n) = value.parse::<f64>() {
            if n.is_finite() {
                return MetadataValue::Number(n);
            }
        }
    }

    if value.len() >= 2 && value.starts_with('[') && value.ends_with(']') {
        return MetadataValue::List(parse_list(&value[1..value.len() - 1]));
    }

    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return match serde_json::from_str::<String>(value) {
            Ok(s) => MetadataValue::Text(s),
            Err(_) => MetadataValue::Text(value[1..value.len() - 1].to_string()),
        };
    }

    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return MetadataValue::Text(value[1..value.len() - 1].to_string());
    }

    MetadataValue::Text(value.to_string())
}

fn parse_list(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in inner.chars() {
        if in_quotes {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            ',' => items.push(std::mem::take(&mut current)),
            '"' => {
                in_quotes = true;
                current.push(c);
            }
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .map(|item| {
            if item.len() >= 2 && item.starts_with('"') && item.ends_with('"') {
                serde_json::from_str::<String>(&item)
                    .unwrap_or_else(|_| item[1..item.len() - 1].to_string())
            } else {
                item
            }
        })
        .collect()
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

fn render_scalar(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Null => "null".to_string(),
        MetadataValue::Bool(b) => b.to_string(),
        MetadataValue::Number(n) if n.is_finite() => n.to_string(),
        MetadataValue::Number(_) => "null".to_string(),
        MetadataValue::Text(s) => {
            let ambiguous = s == "|"
                || s.trim() != s
                || parse_scalar(s) != MetadataValue::Text(s.clone());
            if ambiguous {
                quote(s)
            } else {
                s.clone()
            }
        }
        MetadataValue::List(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    let bare = !item.is_empty()
                        && item.trim() == item
                        && !item.contains([',', '[', ']', '"'])
                        && !item.starts_with('\'');
                    if bare {
                        item.clone()
                    } else {
                        quote(item)
                    }
                })
                .collect();
            format!("[{}]", rendered.join(", "))
        }
    }
}

fn is_marker(line: &str) -> bool {
    line.trim_end() == HEADER_MARKER
}

/// Byte offset just past the closing header marker line
///
/// A header exists only when the document's first line is the marker and a
/// second marker line closes it; otherwise returns `None`.
pub fn header_end(text: &str) -> Option<usize> {
    let first_len = text.find('\n')?;
    if !is_marker(&text[..first_len]) {
        return None;
    }

    let mut pos = first_len + 1;
    while pos <= text.len() {
        let line_end = text[pos..].find('\n').map(|i| pos + i);
        let line = &text[pos..line_end.unwrap_or(text.len())];
        if is_marker(line) {
            return Some(line_end.map(|i| i + 1).unwrap_or(text.len()));
        }
        match line_end {
            Some(i) => pos = i + 1,
            None => break,
        }
    }
    None
}

/// Split a document into its metadata and body
///
/// Documents without a header yield empty metadata and the whole text.
pub fn split_document(text: &str) -> (Metadata, &str) {
    match header_end(text) {
        Some(end) => {
            let open = text.find('\n').map(|i| i + 1).unwrap_or(0);
            let block = &text[open..end];
            let close = block.trim_end_matches('\n').rfind('\n').map(|i| i + 1).unwrap_or(0);
            (Metadata::parse(&block[..close]), &text[end..])
        }
        None => (Metadata::new(), text),
    }
}

/// Set `updates` inside a document's header, leaving every other byte alone
///
/// Only top-level lines whose key matches are rewritten (along with any
/// indented continuation lines under them). Missing keys are inserted just
/// before the closing marker. A document without a header gains one.
/// Use this on documents this codec does not own.
pub fn set_header_keys(text: &str, updates: &[(&str, MetadataValue)]) -> String {
    let render_line = |key: &str, value: &MetadataValue| -> String {
        let mut single = Metadata::new();
        single.insert(key, value.clone());
        single.serialize()
    };

    let Some(end) = header_end(text) else {
        let mut out = String::with_capacity(text.len() + 64);
        out.push_str(HEADER_MARKER);
        out.push('\n');
        for (key, value) in updates {
            out.push_str(&render_line(key, value));
        }
        out.push_str(HEADER_MARKER);
        out.push('\n');
        out.push_str(text);
        return out;
    };

    let open = text.find('\n').map(|i| i + 1).unwrap_or(0);
    let close = open
        + text[open..end]
            .trim_end_matches('\n')
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);

    let mut out = String::with_capacity(text.len() + 64);
    out.push_str(&text[..open]);
    let mut seen = vec![false; updates.len()];
    let mut skipping = false;
    for line in text[open..close].split_inclusive('\n') {
        let indented = line.starts_with([' ', '\t']);
        if skipping && indented {
            continue;
        }
        skipping = false;

        let key = line.split_once(':').map(|(k, _)| k.trim_end());
        let hit = match key {
            Some(key) if !indented => updates.iter().position(|(k, _)| *k == key),
            _ => None,
        };
        match hit {
            Some(i) => {
                let (key, value) = &updates[i];
                out.push_str(&render_line(key, value));
                seen[i] = true;
                skipping = true;
            }
            None => {
                out.push_str(line);
                if !line.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
    for ((key, value), seen) in updates.iter().zip(&seen) {
        if !seen {
            out.push_str(&render_line(key, value));
        }
    }
    out.push_str(&text[close..]);
    out
}

/// Join metadata and body back into a document
pub fn compose_document(meta: &Metadata, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(HEADER_MARKER);
    out.push('\n');
    out.push_str(&meta.serialize());
    out.push_str(HEADER_MARKER);
    out.push('\n');
    out.push_str(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RECORD: &str = concat!(
        "---\n",
        "type: person\n",
        "confidence: 0.9\n",
        "tags: [family, move]\n",
        "due_date: null\n",
        "context: |\n",
        "  Called about the move\n",
        "  - Asked about boxes\n",
        "name: \"Mom\"\n",
        "---\n",
        "# Mom\n",
    );

    #[test]
    fn test_parse_record_header() {
        let (meta, body) = split_document(RECORD);
        assert_eq!(body, "# Mom\n");
        assert_eq!(meta.get_str("type"), Some("person"));
        assert_eq!(meta.get_f64("confidence"), Some(0.9));
        assert_eq!(
            meta.get("tags").and_then(MetadataValue::as_list),
            Some(&["family".to_string(), "move".to_string()][..])
        );
        assert!(meta.get("due_date").unwrap().is_null());
        assert_eq!(
            meta.get_str("context"),
            Some("Called about the move\n- Asked about boxes")
        );
        assert_eq!(meta.get_str("name"), Some("Mom"));
    }

    #[test]
    fn test_block_keeps_interior_blank_lines_only() {
        let meta = Metadata::parse("notes: |\n  one\n\n  two\n\nnext: x");
        assert_eq!(meta.get_str("notes"), Some("one\n\ntwo"));
        assert_eq!(meta.get_str("next"), Some("x"));
    }

    #[test]
    fn test_value_split_at_first_colon() {
        let meta = Metadata::parse("created: 2024-01-15 09:30");
        assert_eq!(meta.get_str("created"), Some("2024-01-15 09:30"));
    }

    #[test]
    fn test_ambiguous_text_is_quoted() {
        let mut meta = Metadata::new();
        meta.insert("a", "true");
        meta.insert("b", "42");
        meta.insert("c", "");
        meta.insert("d", "[not a list]");
        meta.insert("e", "|");
        let out = meta.serialize();
        assert!(out.contains("a: \"true\"\n"));
        assert!(out.contains("b: \"42\"\n"));
        assert!(out.contains("c: \"\"\n"));
        assert_eq!(Metadata::parse(&out), meta);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut meta = Metadata::new();
        meta.insert("a", 1.0);
        meta.insert("b", 2.0);
        meta.insert("a", 3.0);
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(meta.get_f64("a"), Some(3.0));
    }

    #[test]
    fn test_header_requires_leading_marker() {
        assert_eq!(header_end("# Title\n---\nkey: v\n---\n"), None);
        assert_eq!(header_end("---\nkey: v\n"), None);
        assert_eq!(header_end("---\nkey: v\n---\nbody"), Some(15));
        assert_eq!(header_end("---\nkey: v\n---"), Some(14));
    }

    #[test]
    fn test_document_without_header() {
        let (meta, body) = split_document("## Journal\n\nhello\n");
        assert!(meta.is_empty());
        assert_eq!(body, "## Journal\n\nhello\n");
    }

    #[test]
    fn test_compose_then_split() {
        let (meta, body) = split_document(RECORD);
        let doc = compose_document(&meta, body);
        let (meta2, body2) = split_document(&doc);
        assert_eq!(meta, meta2);
        assert_eq!(body, body2);
    }

    #[test]
    fn test_set_header_keys_keeps_foreign_lines() {
        let note = concat!(
            "---\n",
            "title: 'Daily'\n",
            "tags:\n",
            "  - daily\n",
            "# template comment\n",
            "last_processed_offset: 12\n",
            "---\n",
            "## Journal\n",
        );
        let updated = set_header_keys(
            note,
            &[
                ("last_processed_offset", MetadataValue::Number(140.0)),
                ("last_processed", MetadataValue::from("2024-03-01 10:00:00")),
            ],
        );
        assert_eq!(
            updated,
            concat!(
                "---\n",
                "title: 'Daily'\n",
                "tags:\n",
                "  - daily\n",
                "# template comment\n",
                "last_processed_offset: 140\n",
                "last_processed: 2024-03-01 10:00:00\n",
                "---\n",
                "## Journal\n",
            )
        );
    }

    #[test]
    fn test_set_header_keys_drops_continuations_of_replaced_key() {
        let note = "---\nstate:\n  - old\n  - older\nkeep: yes\n---\nbody";
        let updated = set_header_keys(note, &[("state", MetadataValue::Number(3.0))]);
        assert_eq!(updated, "---\nstate: 3\nkeep: yes\n---\nbody");
    }

    #[test]
    fn test_set_header_keys_adds_header() {
        let updated = set_header_keys("## Journal\n", &[("a", MetadataValue::Number(1.0))]);
        assert_eq!(updated, "---\na: 1\n---\n## Journal\n");

        let updated = set_header_keys("---\n---\nbody", &[("a", MetadataValue::Bool(true))]);
        assert_eq!(updated, "---\na: true\n---\nbody");
    }

    #[test]
    fn test_from_json() {
        let value = serde_json::json!(["a", 1, null]);
        assert_eq!(
            MetadataValue::from_json(&value),
            MetadataValue::List(vec!["a".to_string(), "1".to_string()])
        );
        assert_eq!(
            MetadataValue::from_json(&serde_json::json!(0.5)),
            MetadataValue::Number(0.5)
        );
    }

    fn value_strategy() -> impl Strategy<Value = MetadataValue> {
        prop_oneof![
            Just(MetadataValue::Null),
            any::<bool>().prop_map(MetadataValue::Bool),
            (-1.0e9f64..1.0e9f64).prop_map(MetadataValue::Number),
            "[ -~]{0,24}".prop_map(MetadataValue::Text),
            prop::collection::vec("[ -~]{0,12}", 2..4)
                .prop_map(|lines| MetadataValue::Text(lines.join("\n"))),
            prop::collection::vec("[ -~]{0,10}", 0..4).prop_map(|items| {
                MetadataValue::List(items.into_iter().filter(|s| !s.trim().is_empty()).collect())
            }),
        ]
    }

    fn metadata_strategy() -> impl Strategy<Value = Metadata> {
        prop::collection::btree_map("[a-z_][a-z0-9_]{0,10}", value_strategy(), 0..8)
            .prop_map(|map| map.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_serialize_then_parse(meta in metadata_strategy()) {
            prop_assert_eq!(Metadata::parse(&meta.serialize()), meta);
        }

        #[test]
        fn prop_document_round_trip(meta in metadata_strategy(), body in "[ -~\n]{0,40}") {
            let doc = compose_document(&meta, &body);
            let (parsed, rest) = split_document(&doc);
            prop_assert_eq!(parsed, meta);
            prop_assert_eq!(rest, body.as_str());
        }
    }
}
