//! One dashboard page lifetime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tabflow_bridge::{BridgeTags, Window, WindowListener};
use tabflow_protocols::envelope::{
    Envelope, ExtensionPush, PageRequest, TabActionKind, TabActionRequest,
};
use tabflow_protocols::types::{ConnectionStatus, StreamUpdate, Tab, TabGroup};

use crate::client::CategorizeClient;
use crate::credential::CategorizeOptions;
use crate::groups::resolve_groups;
use crate::monitor::{ConnectionMonitor, Heartbeat};
use crate::views;

/// How a [`DashboardSession::organize`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeOutcome {
    /// No tabs to categorize; nothing was sent.
    Skipped,
    /// Groups were built and sent to the extension.
    Applied(Vec<TabGroup>),
    /// The pipeline ended with an error frame.
    Failed(String),
    /// A newer request started before this one finished.
    Superseded,
}

struct SessionState {
    window: Window,
    tags: BridgeTags,
    monitor: ConnectionMonitor,
    tabs: watch::Sender<Arc<Vec<Tab>>>,
    groups: watch::Sender<Arc<Vec<TabGroup>>>,
    generation: AtomicU64,
    client: CategorizeClient,
}

impl SessionState {
    fn post(&self, request: &PageRequest) {
        match Envelope::encode(self.tags.page.clone(), request) {
            Ok(envelope) => {
                self.window.post(envelope);
            }
            Err(e) => warn!("Failed to encode {}: {}", request.action(), e),
        }
    }

    fn on_push(&self, push: ExtensionPush) {
        match push {
            ExtensionPush::Pong => {
                if self.monitor.on_pong() {
                    self.post(&PageRequest::GetTabs);
                }
            }
            ExtensionPush::TabsUpdate(tabs) => {
                debug!("Received {} tab(s)", tabs.len());
                self.tabs.send_replace(Arc::new(tabs));
                self.monitor.on_tabs_update();
            }
        }
    }
}

/// Page-side state: connection, tab snapshot, groups and categorization.
///
/// Dropping the session stops its heartbeat and listener.
pub struct DashboardSession {
    state: Arc<SessionState>,
    cancel: CancellationToken,
    _heartbeat: Heartbeat,
}

impl DashboardSession {
    /// Attach to `window` and start the heartbeat.
    pub fn start(
        window: Window,
        tags: BridgeTags,
        client: CategorizeClient,
        heartbeat_period: Duration,
    ) -> Self {
        let (tabs, _) = watch::channel(Arc::new(Vec::new()));
        let (groups, _) = watch::channel(Arc::new(Vec::new()));
        let state = Arc::new(SessionState {
            window: window.clone(),
            tags: tags.clone(),
            monitor: ConnectionMonitor::new(),
            tabs,
            groups,
            generation: AtomicU64::new(0),
            client,
        });

        let cancel = CancellationToken::new();
        let listener = window.subscribe();
        tokio::spawn(listen(state.clone(), listener, cancel.child_token()));
        let heartbeat = Heartbeat::spawn(window, &tags, heartbeat_period, cancel.child_token());

        Self {
            state,
            cancel,
            _heartbeat: heartbeat,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.monitor.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.state.monitor.subscribe()
    }

    /// Current tab snapshot.
    pub fn tabs(&self) -> Arc<Vec<Tab>> {
        self.state.tabs.borrow().clone()
    }

    pub fn subscribe_tabs(&self) -> watch::Receiver<Arc<Vec<Tab>>> {
        self.state.tabs.subscribe()
    }

    pub fn groups(&self) -> Arc<Vec<TabGroup>> {
        self.state.groups.borrow().clone()
    }

    /// Ask the extension for the tab list.
    pub fn request_tabs(&self) {
        self.state.monitor.on_refresh();
        self.state.post(&PageRequest::GetTabs);
    }

    /// Close or focus a tab. Ids that are not native handles are ignored.
    pub fn tab_action(&self, action: TabActionKind, tab_id: &str) -> bool {
        let Ok(tab_id) = tab_id.parse() else {
            warn!("Ignoring tab action on non-numeric id '{}'", tab_id);
            return false;
        };
        self.state
            .post(&PageRequest::TabAction(TabActionRequest { action, tab_id }));
        true
    }

    pub fn filtered_tabs(&self, query: &str) -> Vec<Tab> {
        let tabs = self.tabs();
        views::filter_tabs(&tabs, query).into_iter().cloned().collect()
    }

    pub fn ungrouped_tabs(&self, query: &str) -> Vec<Tab> {
        let tabs = self.tabs();
        let groups = self.groups();
        views::ungrouped_tabs(&tabs, &groups, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Categorize the current snapshot and apply the resulting groups.
    ///
    /// Frames are passed to `on_update` as they arrive. Starting another
    /// call supersedes this one: its remaining frames are dropped and its
    /// result is never applied.
    pub async fn organize<F>(&self, options: CategorizeOptions, mut on_update: F) -> OrganizeOutcome
    where
        F: FnMut(&StreamUpdate),
    {
        let submitted = self.tabs();
        if submitted.is_empty() {
            debug!("No tabs to organize");
            return OrganizeOutcome::Skipped;
        }

        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let is_current = || self.state.generation.load(Ordering::SeqCst) == generation;
        info!("Organizing {} tab(s), request #{}", submitted.len(), generation);

        let mut updates = self
            .state
            .client
            .categorize(submitted.as_ref().clone(), options);
        while let Some(update) = updates.next().await {
            if !is_current() {
                debug!("Request #{} superseded", generation);
                return OrganizeOutcome::Superseded;
            }
            on_update(&update);
            match update {
                StreamUpdate::Success { data, .. } => {
                    let groups = resolve_groups(&data, &submitted, chrono::Utc::now().timestamp_millis());
                    self.state.groups.send_replace(Arc::new(groups.clone()));
                    self.state.post(&PageRequest::ApplyGroups(groups.clone()));
                    info!("Applied {} group(s)", groups.len());
                    return OrganizeOutcome::Applied(groups);
                }
                StreamUpdate::Error { message } => {
                    warn!("Organize failed: {}", message);
                    return OrganizeOutcome::Failed(message);
                }
                _ => {}
            }
        }

        // The client always ends with a terminal frame.
        OrganizeOutcome::Failed("Stream ended without a result".to_string())
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn listen(state: Arc<SessionState>, mut listener: WindowListener, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            envelope = listener.recv_from(&state.tags.extension) => match envelope {
                Ok(envelope) => match envelope.decode::<ExtensionPush>() {
                    Ok(push) => state.on_push(push),
                    Err(e) => debug!("Dropping extension message: {}", e),
                },
                Err(e) => {
                    debug!("Dashboard listener stopped: {}", e);
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
