//! Tag data model

use serde::{Deserialize, Serialize};

/// Category assigned by the schema when none is given
pub const DEFAULT_CATEGORY: &str = "content";

/// Tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Tag {
    /// Unique tag name, the lookup key
    #[serde(alias = "name")]
    pub name: String,
    /// medium, content or lang
    #[serde(alias = "category")]
    pub category: String,
    #[serde(alias = "description")]
    pub description: String,
}

impl Tag {
    /// Create a new tag in the default category
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            description: description.into(),
        }
    }

    /// Create a new tag in the given category
    pub fn with_category(
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Name-only reference, as carried inside a Post
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Names of every field required for creation that is empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.category.is_empty() {
            missing.push("category");
        }
        if self.description.is_empty() {
            missing.push("description");
        }
        missing
    }
}
