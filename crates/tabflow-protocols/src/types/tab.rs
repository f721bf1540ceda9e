//! Tab and tab group shapes.

use serde::{Deserialize, Serialize};

/// A browser tab as seen by the dashboard.
///
/// The id is the string form of the browser's native integer handle. The
/// dashboard only ever holds whole snapshots of these; a snapshot is
/// replaced on every update and never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

impl Tab {
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            fav_icon_url: None,
            group_id: None,
        }
    }

    /// Native handle parsed back out of the string id.
    pub fn native_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }

    /// Case-insensitive match against title or URL.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.url.to_lowercase().contains(&needle)
    }
}

/// A group built by the dashboard from a categorization result.
///
/// Lives only for the current dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub tab_ids: Vec<String>,
}

/// Fallback palette for groups the model returned without a color.
pub const GROUP_COLORS: [&str; 7] = [
    "#ef4444", "#f59e0b", "#10b981", "#3b82f6", "#8b5cf6", "#ec4899", "#6366f1",
];
