//! Category templates and `{{TOKEN}}` substitution
//!
//! Templates are ordinary vault documents. Placeholders inside the metadata
//! header are substituted value by value and the header is re-serialized
//! through the codec, so names containing `:` or multi-line context cannot
//! corrupt the header. A header value that is exactly one placeholder takes
//! the placeholder's type: `confidence: {{CONFIDENCE}}` becomes a number and
//! `tags: [{{TAGS}}]` a list. The body gets plain text substitution.
//! Unknown placeholders are left as they are.

use crate::clock::Stamp;
use crate::error::FilerError;
use gleaner_domain::metadata::{compose_document, header_end, split_document};
use gleaner_domain::traits::DocumentStore;
use gleaner_domain::{Category, ClassificationResult, Fingerprint, Metadata, MetadataValue};

/// Load `<folder>/<name>.md`
///
/// A missing template is a hard error for the entry being filed.
pub fn load_template<S: DocumentStore>(
    store: &S,
    folder: &str,
    name: &str,
) -> Result<String, FilerError> {
    let path = format!("{}/{}.md", folder, name);
    if !store.exists(&path) {
        return Err(FilerError::TemplateNotFound(name.to_string()));
    }
    store.read(&path).map_err(FilerError::store)
}

/// Values substituted for placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateValues {
    values: Vec<(String, MetadataValue)>,
}

impl TemplateValues {
    /// No values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of `token` (without braces)
    pub fn set(&mut self, token: impl Into<String>, value: impl Into<MetadataValue>) {
        let token = token.into();
        let value = value.into();
        match self.values.iter_mut().find(|(t, _)| *t == token) {
            Some(slot) => slot.1 = value,
            None => self.values.push((token, value)),
        }
    }

    /// Value of `token`, if set
    pub fn get(&self, token: &str) -> Option<&MetadataValue> {
        self.values.iter().find(|(t, _)| t == token).map(|(_, v)| v)
    }

    /// Values for a new record of `category`
    ///
    /// Common tokens are `NAME`, `SOURCE`, `CONFIDENCE`, `ENTRY_HASH`, `TAGS`
    /// and `DATE`; each category field adds its own placeholder, falling back
    /// to the field default when the classifier gave no value.
    pub fn for_record(
        category: Category,
        result: &ClassificationResult,
        hash: &Fingerprint,
        source: &str,
        stamp: &Stamp,
    ) -> Self {
        let mut values = Self::new();
        values.set("NAME", result.name().unwrap_or_else(|| "Untitled".to_string()));
        values.set("SOURCE", source);
        values.set("CONFIDENCE", result.confidence);
        values.set("ENTRY_HASH", hash.as_str());
        values.set("TAGS", result.tags());
        values.set("DATE", stamp.date());

        for field in category.spec().fields {
            let value = match result.text_field(field.key) {
                Some(text) => MetadataValue::Text(text),
                None if field.default == "null" => MetadataValue::Null,
                None => MetadataValue::Text(field.default.to_string()),
            };
            values.set(field.placeholder, value);
        }
        values
    }
}

/// Render a template
pub fn render(template: &str, values: &TemplateValues) -> String {
    if header_end(template).is_none() {
        return substitute(template, values);
    }

    let (meta, body) = split_document(template);
    let rendered: Metadata = meta
        .iter()
        .map(|(key, value)| (key.to_string(), render_value(value, values)))
        .collect();
    compose_document(&rendered, &substitute(body, values))
}

fn render_value(value: &MetadataValue, values: &TemplateValues) -> MetadataValue {
    match value {
        MetadataValue::Text(text) => match sole_token(text).and_then(|t| values.get(t)) {
            Some(v) => v.clone(),
            None => MetadataValue::Text(substitute(text, values)),
        },
        MetadataValue::List(items) => MetadataValue::List(
            items
                .iter()
                .flat_map(|item| match sole_token(item).and_then(|t| values.get(t)) {
                    Some(MetadataValue::List(list)) => list.clone(),
                    Some(MetadataValue::Null) => Vec::new(),
                    Some(other) => vec![other.to_string()],
                    None => vec![substitute(item, values)],
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// The token name when `text` is a single placeholder
fn sole_token(text: &str) -> Option<&str> {
    text.trim()
        .strip_prefix("{{")?
        .strip_suffix("}}")
        .filter(|t| is_token(t))
}

fn is_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn substitute(text: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let known = after
            .find("}}")
            .and_then(|close| values.get(&after[..close]).map(|v| (close, v)));
        match known {
            Some((close, value)) => {
                out.push_str(&value.to_string());
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Built-in template for `category`, written by `gleaner init`
pub fn default_template(category: Category) -> &'static str {
    match category {
        Category::People => PERSON_TEMPLATE,
        Category::Projects => PROJECT_TEMPLATE,
        Category::Ideas => IDEA_TEMPLATE,
        Category::Admin => ADMIN_TEMPLATE,
    }
}

const PERSON_TEMPLATE: &str = "---
type: person
name: {{NAME}}
context: {{CONTEXT}}
follow_ups: {{FOLLOWUPS}}
tags: [{{TAGS}}]
confidence: {{CONFIDENCE}}
entry_hash: {{ENTRY_HASH}}
source: \"[[{{SOURCE}}]]\"
created: {{DATE}}
last_touched: {{DATE}}
---
# {{NAME}}

## Context
{{CONTEXT}}

## Follow-ups
{{FOLLOWUPS}}

## History
- {{DATE}}: Created from [[{{SOURCE}}]]
";

const PROJECT_TEMPLATE: &str = "---
type: project
name: {{NAME}}
status: {{STATUS}}
next_action: {{NEXT_ACTION}}
notes: {{NOTES}}
tags: [{{TAGS}}]
confidence: {{CONFIDENCE}}
entry_hash: {{ENTRY_HASH}}
source: \"[[{{SOURCE}}]]\"
created: {{DATE}}
last_touched: {{DATE}}
---
# {{NAME}}

**Status:** {{STATUS}}
**Next action:** {{NEXT_ACTION}}

## Notes
{{NOTES}}

## History
- {{DATE}}: Created from [[{{SOURCE}}]]
";

const IDEA_TEMPLATE: &str = "---
type: idea
name: {{NAME}}
one_liner: {{ONE_LINER}}
notes: {{NOTES}}
tags: [{{TAGS}}]
confidence: {{CONFIDENCE}}
entry_hash: {{ENTRY_HASH}}
source: \"[[{{SOURCE}}]]\"
created: {{DATE}}
last_touched: {{DATE}}
---
# {{NAME}}

> {{ONE_LINER}}

## Notes
{{NOTES}}

## History
- {{DATE}}: Created from [[{{SOURCE}}]]
";

const ADMIN_TEMPLATE: &str = "---
type: admin
name: {{NAME}}
due_date: {{DUE_DATE}}
status: {{STATUS}}
notes: {{NOTES}}
tags: [{{TAGS}}]
confidence: {{CONFIDENCE}}
entry_hash: {{ENTRY_HASH}}
source: \"[[{{SOURCE}}]]\"
created: {{DATE}}
last_touched: {{DATE}}
---
# {{NAME}}

**Due:** {{DUE_DATE}}

## Notes
{{NOTES}}

## History
- {{DATE}}: Created from [[{{SOURCE}}]]
";
