//! `@category: text` overrides

use gleaner_domain::Category;

/// An entry whose author already chose the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Override<'a> {
    /// Forced category
    pub category: Category,

    /// Entry text after the prefix, trimmed
    pub text: &'a str,
}

/// Detect an `@people:`, `@projects:`, `@ideas:` or `@admin:` prefix
///
/// The category name is case-insensitive and must directly follow the `@`.
/// The remaining text may span several lines; an empty remainder is not an
/// override.
pub fn parse_override(text: &str) -> Option<Override<'_>> {
    let rest = text.strip_prefix('@')?;
    let (name, body) = rest.split_once(':')?;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let category = Category::parse(name)?;
    let body = body.trim();
    (!body.is_empty()).then_some(Override {
        category,
        text: body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_detected() {
        let o = parse_override("@projects: Fix the leak").unwrap();
        assert_eq!(o.category, Category::Projects);
        assert_eq!(o.text, "Fix the leak");
    }

    #[test]
    fn test_case_insensitive_and_multiline() {
        let o = parse_override("@People:Sam moved to Denver\nNew number soon").unwrap();
        assert_eq!(o.category, Category::People);
        assert_eq!(o.text, "Sam moved to Denver\nNew number soon");
    }

    #[test]
    fn test_not_overrides() {
        assert_eq!(parse_override("Fix the leak @projects: later"), None);
        assert_eq!(parse_override("@tasks: buy milk"), None);
        assert_eq!(parse_override("@ projects: spaced"), None);
        assert_eq!(parse_override("@admin:   "), None);
        assert_eq!(parse_override("@admin no colon"), None);
    }
}
