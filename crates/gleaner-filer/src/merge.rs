//! Structured merge of a classification into an existing record

use crate::clock::Stamp;
use gleaner_domain::metadata::{compose_document, split_document};
use gleaner_domain::{Category, ClassificationResult, MergeRule, MetadataValue};

/// Fold `result` into the record text `current`
///
/// - `last_touched` becomes today and `confidence` the larger of the two.
/// - Each category field follows its merge rule: append fields gain a new
///   bullet unless the incoming text is already present, overwrite fields
///   take any incoming value, preserve fields are left alone.
/// - Incoming tags are added to the tag list.
/// - A timestamped history entry quoting `original_text` and citing `source`
///   is appended to the body.
pub fn merge_record(
    current: &str,
    category: Category,
    result: &ClassificationResult,
    original_text: &str,
    source: &str,
    stamp: &Stamp,
) -> String {
    let (mut meta, body) = split_document(current);

    meta.insert("last_touched", stamp.date());
    let confidence = meta.get_f64("confidence").unwrap_or(0.0).max(result.confidence);
    meta.insert("confidence", confidence);

    for field in category.spec().fields {
        let Some(incoming) = result.text_field(field.key) else {
            continue;
        };
        match field.merge {
            MergeRule::Append => {
                let existing = meta
                    .get(field.key)
                    .filter(|v| !v.is_null())
                    .map(|v| v.to_string());
                meta.insert(field.key, append_field(existing.as_deref(), &incoming));
            }
            MergeRule::Overwrite => meta.insert(field.key, incoming),
            MergeRule::Preserve => {}
        }
    }

    let incoming_tags = result.tags();
    if !incoming_tags.is_empty() {
        let mut tags: Vec<String> = meta
            .get("tags")
            .and_then(|v| v.as_list())
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        for tag in incoming_tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        meta.insert("tags", MetadataValue::List(tags));
    }

    let mut body = body.to_string();
    body.push_str(&history_entry(original_text, source, stamp));
    compose_document(&meta, &body)
}

/// Append `incoming` as a new bullet unless `existing` already contains it
pub fn append_field(existing: Option<&str>, incoming: &str) -> String {
    match existing {
        Some(existing) if !existing.trim().is_empty() => {
            if existing.contains(incoming) {
                existing.to_string()
            } else {
                format!("{}\n- {}", existing, incoming)
            }
        }
        _ => incoming.to_string(),
    }
}

fn history_entry(original_text: &str, source: &str, stamp: &Stamp) -> String {
    let quoted: Vec<String> = original_text.lines().map(|line| format!("> {}", line)).collect();
    format!(
        "\n---\n**{}** - Merged from [[{}]]:\n{}\n",
        stamp.minute(),
        source,
        quoted.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_domain::Destination;
    use serde_json::json;

    const RECORD: &str = "---\n\
type: project\n\
name: Leak\n\
status: active\n\
next_action: Call plumber\n\
notes: Under the sink\n\
tags: [home]\n\
confidence: 0.7\n\
last_touched: 2024-01-01\n\
---\n\
# Leak\n";

    fn projects(confidence: f64, data: serde_json::Value) -> ClassificationResult {
        ClassificationResult::new(
            Destination::Projects,
            confidence,
            data.as_object().cloned().unwrap_or_default(),
        )
    }

    #[test]
    fn test_merge_updates_fields() {
        let result = projects(
            0.9,
            json!({"status": "blocked", "notes": "Parts ordered", "tags": ["home", "repair"]}),
        );
        let stamp = Stamp::now();
        let merged =
            merge_record(RECORD, Category::Projects, &result, "Leak update", "Journal/d", &stamp);
        let (meta, body) = split_document(&merged);

        assert_eq!(meta.get_str("status"), Some("blocked"));
        assert_eq!(meta.get_str("next_action"), Some("Call plumber"));
        assert_eq!(meta.get_str("notes"), Some("Under the sink\n- Parts ordered"));
        assert_eq!(meta.get_f64("confidence"), Some(0.9));
        assert_eq!(meta.get_str("last_touched"), Some(stamp.date().as_str()));
        assert_eq!(
            meta.get("tags").and_then(|v| v.as_list()),
            Some(&["home".to_string(), "repair".to_string()][..])
        );
        assert!(body.starts_with("# Leak\n"));
        assert!(body.contains("Merged from [[Journal/d]]:\n> Leak update\n"));
    }

    #[test]
    fn test_merge_does_not_duplicate_text() {
        let result = projects(0.8, json!({"notes": "Under the sink"}));
        let merged = merge_record(RECORD, Category::Projects, &result, "x", "s", &Stamp::now());
        let (meta, _) = split_document(&merged);
        assert_eq!(meta.get_str("notes"), Some("Under the sink"));
    }

    #[test]
    fn test_confidence_never_drops() {
        let result = projects(0.3, json!({}));
        let merged = merge_record(RECORD, Category::Projects, &result, "x", "s", &Stamp::now());
        let (meta, _) = split_document(&merged);
        assert_eq!(meta.get_f64("confidence"), Some(0.7));
    }

    #[test]
    fn test_overwrite_with_equal_value_is_stable() {
        let result = projects(0.7, json!({"status": "active", "next_action": "Call plumber"}));
        let stamp = Stamp::now();
        let once = merge_record(RECORD, Category::Projects, &result, "x", "s", &stamp);
        let (first, _) = split_document(&once);
        let twice = merge_record(&once, Category::Projects, &result, "x", "s", &stamp);
        let (second, _) = split_document(&twice);
        assert_eq!(first, second);
    }

    #[test]
    fn test_preserve_field_untouched() {
        let record = "---\nname: Garden\none_liner: Grow tomatoes\n---\n";
        let result = ClassificationResult::new(
            Destination::Ideas,
            0.9,
            json!({"one_liner": "Something else"}).as_object().cloned().unwrap_or_default(),
        );
        let merged = merge_record(record, Category::Ideas, &result, "x", "s", &Stamp::now());
        let (meta, _) = split_document(&merged);
        assert_eq!(meta.get_str("one_liner"), Some("Grow tomatoes"));
    }

    #[test]
    fn test_append_field() {
        assert_eq!(append_field(None, "new"), "new");
        assert_eq!(append_field(Some(""), "new"), "new");
        assert_eq!(append_field(Some("old"), "new"), "old\n- new");
        assert_eq!(append_field(Some("old\n- new"), "new"), "old\n- new");
    }

    #[test]
    fn test_multiline_history_is_quoted() {
        let merged = merge_record(
            "---\nname: A\n---\n",
            Category::Ideas,
            &ClassificationResult::new(Destination::Ideas, 0.9, Default::default()),
            "line one\nline two",
            "src",
            &Stamp::now(),
        );
        assert!(merged.ends_with("> line one\n> line two\n"));
    }
}
