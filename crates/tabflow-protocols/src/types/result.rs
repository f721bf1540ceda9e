//! Categorization result shape.

use serde::{Deserialize, Serialize};

/// Result of one categorization request.
///
/// `tab_indices` are positional offsets into the exact tab list that was
/// submitted with the request, not tab ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AIResult {
    #[serde(default)]
    pub groups: Vec<AIGroup>,
}

/// One proposed group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub tab_indices: Vec<usize>,
}

impl AIGroup {
    pub fn new(name: impl Into<String>, color: impl Into<String>, tab_indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: color.into(),
            tab_indices,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
