//! Native browser tab platform.
//!
//! The background worker talks to the browser only through [`TabPlatform`],
//! so the registry logic can run against a real browser binding or an
//! in-memory stand-in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::PlatformError;
use crate::types::Tab;

/// Tab as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTab {
    pub id: i64,
    pub window_id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub active: bool,
}

impl From<&NativeTab> for Tab {
    fn from(native: &NativeTab) -> Self {
        Tab {
            id: native.id.to_string(),
            url: native.url.clone(),
            title: native.title.clone(),
            fav_icon_url: native.fav_icon_url.clone(),
            group_id: native.group_id,
        }
    }
}

/// Tab lifecycle events raised by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEvent {
    Created(i64),
    Updated(i64),
    Removed(i64),
}

/// The fixed palette native tab groups can be colored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl GroupColor {
    pub const ALL: [GroupColor; 9] = [
        GroupColor::Grey,
        GroupColor::Blue,
        GroupColor::Red,
        GroupColor::Yellow,
        GroupColor::Green,
        GroupColor::Pink,
        GroupColor::Purple,
        GroupColor::Cyan,
        GroupColor::Orange,
    ];
}

/// Browser tab API as seen by the background worker.
#[async_trait]
pub trait TabPlatform: Send + Sync {
    /// All tabs across all windows.
    async fn query_tabs(&self) -> Result<Vec<NativeTab>, PlatformError>;

    /// Active tab of every window.
    async fn active_tabs(&self) -> Result<Vec<NativeTab>, PlatformError>;

    async fn get_tab(&self, tab_id: i64) -> Result<NativeTab, PlatformError>;

    async fn remove_tab(&self, tab_id: i64) -> Result<(), PlatformError>;

    /// Make the tab the active one in its window.
    async fn activate_tab(&self, tab_id: i64) -> Result<(), PlatformError>;

    /// Bring a window to the foreground.
    async fn focus_window(&self, window_id: i64) -> Result<(), PlatformError>;

    /// Put tabs into a new native group and return its id.
    async fn group_tabs(&self, tab_ids: &[i64]) -> Result<i64, PlatformError>;

    async fn update_group(
        &self,
        group_id: i64,
        title: &str,
        color: GroupColor,
    ) -> Result<(), PlatformError>;

    /// Subscribe to tab lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<TabEvent>;
}
