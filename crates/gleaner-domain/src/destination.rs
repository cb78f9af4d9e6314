//! Destination module - where a classified entry ends up
//!
//! The four record categories each carry a static [`CategorySpec`] describing
//! their collection folder, template, extraction schema and per-field merge
//! rules. `needs_review` is the fifth destination and has no record behind it.

/// How an incoming field value is folded into an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Append as a new bullet unless the text is already present
    Append,
    /// Replace the stored value whenever an incoming value is present
    Overwrite,
    /// Only written when the record is created
    Preserve,
}

/// A category-specific metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the classifier's `data` object and in the record metadata
    pub key: &'static str,

    /// Template placeholder name (without braces)
    pub placeholder: &'static str,

    /// Value substituted into the template when the classifier gave none
    pub default: &'static str,

    /// Merge behaviour for existing records
    pub merge: MergeRule,
}

/// Static description of a record category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySpec {
    /// Collection folder the records live in
    pub collection: &'static str,

    /// Template document name (without extension)
    pub template: &'static str,

    /// Category-specific fields
    pub fields: &'static [FieldSpec],

    /// JSON shape of `data` requested from the classifier
    pub schema_hint: &'static str,
}

/// Record category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// A person, relationship update, something someone said
    People,

    /// Multi-step work with a next action
    Projects,

    /// A thought or concept to explore later
    Ideas,

    /// A one-off errand, often with a due date
    Admin,
}

const PEOPLE: CategorySpec = CategorySpec {
    collection: "People",
    template: "Person-Template",
    fields: &[
        FieldSpec {
            key: "context",
            placeholder: "CONTEXT",
            default: "",
            merge: MergeRule::Append,
        },
        FieldSpec {
            key: "follow_ups",
            placeholder: "FOLLOWUPS",
            default: "",
            merge: MergeRule::Append,
        },
    ],
    schema_hint: r#"{"name": "...", "context": "...", "follow_ups": "...", "tags": ["..."]}"#,
};

const PROJECTS: CategorySpec = CategorySpec {
    collection: "Projects",
    template: "Project-Template",
    fields: &[
        FieldSpec {
            key: "status",
            placeholder: "STATUS",
            default: "active",
            merge: MergeRule::Overwrite,
        },
        FieldSpec {
            key: "next_action",
            placeholder: "NEXT_ACTION",
            default: "",
            merge: MergeRule::Overwrite,
        },
        FieldSpec {
            key: "notes",
            placeholder: "NOTES",
            default: "",
            merge: MergeRule::Append,
        },
    ],
    schema_hint: r#"{"name": "...", "status": "active", "next_action": "...", "notes": "...", "tags": ["..."]}"#,
};

const IDEAS: CategorySpec = CategorySpec {
    collection: "Ideas",
    template: "Idea-Template",
    fields: &[
        FieldSpec {
            key: "one_liner",
            placeholder: "ONE_LINER",
            default: "",
            merge: MergeRule::Preserve,
        },
        FieldSpec {
            key: "notes",
            placeholder: "NOTES",
            default: "",
            merge: MergeRule::Append,
        },
    ],
    schema_hint: r#"{"name": "...", "one_liner": "...", "notes": "...", "tags": ["..."]}"#,
};

const ADMIN: CategorySpec = CategorySpec {
    collection: "Admin",
    template: "Admin-Template",
    fields: &[
        FieldSpec {
            key: "due_date",
            placeholder: "DUE_DATE",
            default: "null",
            merge: MergeRule::Overwrite,
        },
        FieldSpec {
            key: "status",
            placeholder: "STATUS",
            default: "active",
            merge: MergeRule::Overwrite,
        },
        FieldSpec {
            key: "notes",
            placeholder: "NOTES",
            default: "",
            merge: MergeRule::Append,
        },
    ],
    schema_hint: r#"{"name": "...", "due_date": "YYYY-MM-DD or null", "notes": "...", "tags": []}"#,
};

impl Category {
    /// All record categories, in prompt order
    pub const ALL: [Category; 4] = [
        Category::People,
        Category::Projects,
        Category::Ideas,
        Category::Admin,
    ];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::People => "people",
            Category::Projects => "projects",
            Category::Ideas => "ideas",
            Category::Admin => "admin",
        }
    }

    /// Parse a category from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "people" => Some(Category::People),
            "projects" => Some(Category::Projects),
            "ideas" => Some(Category::Ideas),
            "admin" => Some(Category::Admin),
            _ => None,
        }
    }

    /// Static description of this category
    pub fn spec(&self) -> &'static CategorySpec {
        match self {
            Category::People => &PEOPLE,
            Category::Projects => &PROJECTS,
            Category::Ideas => &IDEAS,
            Category::Admin => &ADMIN,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid category: {}", s))
    }
}

/// Classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Destination {
    /// File under People
    People,
    /// File under Projects
    Projects,
    /// File under Ideas
    Ideas,
    /// File under Admin
    Admin,
    /// Route to the human review queue
    NeedsReview,
}

impl Destination {
    /// Get the destination name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::People => "people",
            Destination::Projects => "projects",
            Destination::Ideas => "ideas",
            Destination::Admin => "admin",
            Destination::NeedsReview => "needs_review",
        }
    }

    /// Parse a destination from its exact wire name
    ///
    /// Unlike [`Category::parse`] this is case-sensitive: the classifier
    /// contract names destinations in lowercase.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "people" => Some(Destination::People),
            "projects" => Some(Destination::Projects),
            "ideas" => Some(Destination::Ideas),
            "admin" => Some(Destination::Admin),
            "needs_review" => Some(Destination::NeedsReview),
            _ => None,
        }
    }

    /// The record category, or `None` for `needs_review`
    pub fn category(&self) -> Option<Category> {
        match self {
            Destination::People => Some(Category::People),
            Destination::Projects => Some(Category::Projects),
            Destination::Ideas => Some(Category::Ideas),
            Destination::Admin => Some(Category::Admin),
            Destination::NeedsReview => None,
        }
    }
}

impl From<Category> for Destination {
    fn from(category: Category) -> Self {
        match category {
            Category::People => Destination::People,
            Category::Projects => Destination::Projects,
            Category::Ideas => Destination::Ideas,
            Category::Admin => Destination::Admin,
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid destination: {}", s))
    }
}
