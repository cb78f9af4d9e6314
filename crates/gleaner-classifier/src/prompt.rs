//! Prompt construction for the classification service

use gleaner_domain::classification::excerpt;
use gleaner_domain::Category;

const CLASSIFY_INSTRUCTIONS: &str = "You classify short notes for a personal knowledge base. \
Reply with a single JSON object and nothing else.";

const CATEGORY_GUIDE: &str = r#"CATEGORIES:
- "people": a person, a relationship update, something someone said
- "projects": multi-step or ongoing work with a next action
- "ideas": a thought, insight or concept to explore later
- "admin": a one-off errand or chore, often with a due date
- "needs_review": unclear, or your confidence is below 0.6"#;

const CLASSIFY_RULES: &str = r#"RULES:
- If confidence is below 0.6, destination MUST be "needs_review"
- "next_action" must be specific and executable
- Project status is one of "active", "waiting", "blocked", "someday"
- Dates use YYYY-MM-DD, or null when none is mentioned
- Use an empty tags array when no tag fits
- Return raw JSON without markdown fences"#;

const FORCED_RULES: &str = r#"RULES:
- Extract details stated in the text; do not invent information
- Dates use YYYY-MM-DD, or null
- Keep tags short and relevant"#;

/// Builds prompts for the classification service
pub struct PromptBuilder {
    text: String,
    forced: Option<Category>,
    forced_confidence: f64,
}

impl PromptBuilder {
    /// Prompt asking the service to choose a category
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            forced: None,
            forced_confidence: 0.95,
        }
    }

    /// Prompt asking only for the fields of `category`
    pub fn forced(text: impl Into<String>, category: Category) -> Self {
        Self {
            forced: Some(category),
            ..Self::new(text)
        }
    }

    /// Confidence the forced prompt's example reply shows
    pub fn with_forced_confidence(mut self, confidence: f64) -> Self {
        self.forced_confidence = confidence;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        match self.forced {
            Some(category) => self.build_forced(category),
            None => self.build_full(),
        }
    }

    fn build_full(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(CLASSIFY_INSTRUCTIONS);
        prompt.push_str("\n\nINPUT:\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n\n");
        prompt.push_str(CATEGORY_GUIDE);
        prompt.push_str("\n\nREPLY SHAPE, by destination:\n\n");

        for category in Category::ALL {
            prompt.push_str(&format!(
                "{}:\n{{\"destination\": \"{}\", \"confidence\": 0.85, \"data\": {}}}\n\n",
                category.as_str().to_uppercase(),
                category.as_str(),
                category.spec().schema_hint
            ));
        }

        let example_text = serde_json::to_string(&excerpt(&self.text, 100))
            .unwrap_or_else(|_| "\"...\"".to_string());
        prompt.push_str(&format!(
            "NEEDS_REVIEW:\n{{\"destination\": \"needs_review\", \"confidence\": 0.45, \"data\": \
{{\"original_text\": {}, \"possible_categories\": [\"projects\", \"admin\"], \
\"reason\": \"Could be a project or a simple task\"}}}}\n\n",
            example_text
        ));
        prompt.push_str(CLASSIFY_RULES);
        prompt
    }

    fn build_forced(&self, category: Category) -> String {
        let name = category.as_str();
        format!(
            "Extract structured data from this text for a {name} record.\n\n\
TEXT: {text}\n\n\
CATEGORY: {name}\n\n\
Reply with only this JSON shape:\n\
{{\n  \"destination\": \"{name}\",\n  \"confidence\": {confidence},\n  \"data\": {schema}\n}}\n\n\
{rules}",
            name = name,
            text = self.text,
            confidence = self.forced_confidence,
            schema = category.spec().schema_hint,
            rules = FORCED_RULES,
        )
    }
}
