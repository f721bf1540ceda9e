//! In-memory tab platform.
//!
//! Stands in for the browser when the bridge runs outside an extension
//! host: tests, the CLI demo, local development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use tabflow_protocols::error::PlatformError;
use tabflow_protocols::platform::{GroupColor, NativeTab, TabEvent, TabPlatform};

const EVENT_CAPACITY: usize = 128;

#[derive(Debug, Default)]
struct PlatformState {
    tabs: Vec<NativeTab>,
    groups: HashMap<i64, NativeGroup>,
    focused_window: Option<i64>,
    next_tab_id: i64,
    next_group_id: i64,
}

/// A native group as the in-memory platform records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeGroup {
    pub title: String,
    pub color: Option<GroupColor>,
    pub tab_ids: Vec<i64>,
}

/// Browser stand-in holding tabs, windows and groups in memory.
pub struct InMemoryPlatform {
    state: Mutex<PlatformState>,
    events: broadcast::Sender<TabEvent>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(PlatformState {
                next_tab_id: 1,
                next_group_id: 1,
                ..Default::default()
            }),
            events,
        }
    }

    /// Open a tab in `window_id`, making it that window's active tab.
    pub fn open_tab(&self, window_id: i64, url: &str, title: &str) -> i64 {
        let id = {
            let mut state = self.state.lock();
            let id = state.next_tab_id;
            state.next_tab_id += 1;
            for tab in state.tabs.iter_mut().filter(|t| t.window_id == window_id) {
                tab.active = false;
            }
            state.tabs.push(NativeTab {
                id,
                window_id,
                url: url.to_string(),
                title: title.to_string(),
                fav_icon_url: None,
                group_id: None,
                active: true,
            });
            id
        };
        self.emit(TabEvent::Created(id));
        id
    }

    /// Change a tab's title, as a page navigation would.
    pub fn set_title(&self, tab_id: i64, title: &str) -> Result<(), PlatformError> {
        {
            let mut state = self.state.lock();
            let tab = state
                .tabs
                .iter_mut()
                .find(|t| t.id == tab_id)
                .ok_or(PlatformError::TabNotFound(tab_id))?;
            tab.title = title.to_string();
        }
        self.emit(TabEvent::Updated(tab_id));
        Ok(())
    }

    pub fn focused_window(&self) -> Option<i64> {
        self.state.lock().focused_window
    }

    pub fn group(&self, group_id: i64) -> Option<NativeGroup> {
        self.state.lock().groups.get(&group_id).cloned()
    }

    pub fn groups(&self) -> Vec<NativeGroup> {
        let state = self.state.lock();
        let mut ids: Vec<_> = state.groups.keys().copied().collect();
        ids.sort_unstable();
        ids.iter().filter_map(|id| state.groups.get(id).cloned()).collect()
    }

    fn emit(&self, event: TabEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabPlatform for InMemoryPlatform {
    async fn query_tabs(&self) -> Result<Vec<NativeTab>, PlatformError> {
        Ok(self.state.lock().tabs.clone())
    }

    async fn active_tabs(&self) -> Result<Vec<NativeTab>, PlatformError> {
        Ok(self.state.lock().tabs.iter().filter(|t| t.active).cloned().collect())
    }

    async fn get_tab(&self, tab_id: i64) -> Result<NativeTab, PlatformError> {
        self.state
            .lock()
            .tabs
            .iter()
            .find(|t| t.id == tab_id)
            .cloned()
            .ok_or(PlatformError::TabNotFound(tab_id))
    }

    async fn remove_tab(&self, tab_id: i64) -> Result<(), PlatformError> {
        {
            let mut state = self.state.lock();
            let before = state.tabs.len();
            state.tabs.retain(|t| t.id != tab_id);
            if state.tabs.len() == before {
                return Err(PlatformError::TabNotFound(tab_id));
            }
            for group in state.groups.values_mut() {
                group.tab_ids.retain(|id| *id != tab_id);
            }
        }
        self.emit(TabEvent::Removed(tab_id));
        Ok(())
    }

    async fn activate_tab(&self, tab_id: i64) -> Result<(), PlatformError> {
        {
            let mut state = self.state.lock();
            let window_id = state
                .tabs
                .iter()
                .find(|t| t.id == tab_id)
                .map(|t| t.window_id)
                .ok_or(PlatformError::TabNotFound(tab_id))?;
            for tab in state.tabs.iter_mut().filter(|t| t.window_id == window_id) {
                tab.active = tab.id == tab_id;
            }
        }
        self.emit(TabEvent::Updated(tab_id));
        Ok(())
    }

    async fn focus_window(&self, window_id: i64) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        if !state.tabs.iter().any(|t| t.window_id == window_id) {
            return Err(PlatformError::WindowNotFound(window_id));
        }
        state.focused_window = Some(window_id);
        Ok(())
    }

    async fn group_tabs(&self, tab_ids: &[i64]) -> Result<i64, PlatformError> {
        if tab_ids.is_empty() {
            return Err(PlatformError::EmptyGroup);
        }
        let group_id = {
            let mut state = self.state.lock();
            if let Some(missing) = tab_ids.iter().find(|id| !state.tabs.iter().any(|t| t.id == **id)) {
                return Err(PlatformError::TabNotFound(*missing));
            }
            let group_id = state.next_group_id;
            state.next_group_id += 1;
            for tab in state.tabs.iter_mut().filter(|t| tab_ids.contains(&t.id)) {
                tab.group_id = Some(group_id);
            }
            for group in state.groups.values_mut() {
                group.tab_ids.retain(|id| !tab_ids.contains(id));
            }
            state.groups.insert(
                group_id,
                NativeGroup {
                    title: String::new(),
                    color: None,
                    tab_ids: tab_ids.to_vec(),
                },
            );
            group_id
        };
        debug!("Grouped {} tab(s) into native group {}", tab_ids.len(), group_id);
        for id in tab_ids {
            self.emit(TabEvent::Updated(*id));
        }
        Ok(group_id)
    }

    async fn update_group(
        &self,
        group_id: i64,
        title: &str,
        color: GroupColor,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        let group = state
            .groups
            .get_mut(&group_id)
            .ok_or(PlatformError::GroupNotFound(group_id))?;
        group.title = title.to_string();
        group.color = Some(color);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<TabEvent> {
        self.events.subscribe()
    }
}
