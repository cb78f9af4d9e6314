//! Section scanning

/// Title of a `## ` section heading, if `line` is one
///
/// `### ` and deeper headings are ordinary content.
pub(crate) fn section_title(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether a section title names a capture area
pub(crate) fn is_capturable(title: &str, headings: &[String]) -> bool {
    let title = normalize(title);
    headings
        .iter()
        .map(|h| normalize(h))
        .any(|h| !h.is_empty() && title.starts_with(&h))
}

/// Text of each capture section at or after `start`
///
/// Scanning begins at `body_start` so that a section heading located before
/// `start` still decides whether the text following `start` is captured. A
/// line straddling `start` contributes only its suffix.
pub(crate) fn capturable_sections(
    text: &str,
    body_start: usize,
    start: usize,
    headings: &[String],
) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    let mut pos = body_start;

    for raw in text[body_start..].split_inclusive('\n') {
        let line_start = pos;
        pos += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(title) = section_title(line) {
            if let Some(lines) = current.take() {
                sections.push(lines.join("\n"));
            }
            current = is_capturable(title, headings).then(Vec::new);
            continue;
        }

        if start > line_start + line.len() {
            continue;
        }
        if let Some(lines) = current.as_mut() {
            let from = start.saturating_sub(line_start);
            lines.push(line.get(from..).unwrap_or(""));
        }
    }

    if let Some(lines) = current {
        sections.push(lines.join("\n"));
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headings() -> Vec<String> {
        vec!["Journal".to_string(), "Scratch Pad".to_string()]
    }

    #[test]
    fn test_section_title() {
        assert_eq!(section_title("## Journal"), Some("Journal"));
        assert_eq!(section_title("##\tTasks "), Some("Tasks"));
        assert_eq!(section_title("### Deeper"), None);
        assert_eq!(section_title("##NoSpace"), None);
        assert_eq!(section_title("# Title"), None);
    }

    #[test]
    fn test_capturable_headings() {
        assert!(is_capturable("Journal", &headings()));
        assert!(is_capturable("journal entries", &headings()));
        assert!(is_capturable("Scratch Pad", &headings()));
        assert!(is_capturable("scratchpad", &headings()));
        assert!(!is_capturable("Tasks", &headings()));
    }

    #[test]
    fn test_only_capture_sections_are_kept() {
        let text =
            "intro\n## Tasks\n- [ ] task\n## Journal\nentry one\n## Notes\nskip\n## Scratch Pad\nscratch\n";
        let sections = capturable_sections(text, 0, 0, &headings());
        assert_eq!(sections, vec!["entry one", "scratch"]);
    }

    #[test]
    fn test_heading_before_start_still_applies() {
        let text = "## Journal\nold entry\nnew entry\n";
        let start = text.find("new").unwrap();
        let sections = capturable_sections(text, 0, start, &headings());
        assert_eq!(sections, vec!["new entry"]);
    }

    #[test]
    fn test_straddling_line_contributes_suffix() {
        let text = "## Journal\nabcdef\n";
        let start = text.find('d').unwrap();
        assert_eq!(capturable_sections(text, 0, start, &headings()), vec!["def"]);
    }
}
