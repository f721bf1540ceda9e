//! Tab registry worker.
//!
//! Owns the authoritative tab list. Requests are processed one at a time
//! from a mailbox, so access to the native platform is serialized without
//! any locking on this side.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tabflow_protocols::envelope::{ExtensionPush, PageRequest, TabActionKind, TabActionRequest};
use tabflow_protocols::error::{BridgeError, PlatformError};
use tabflow_protocols::platform::{TabEvent, TabPlatform};
use tabflow_protocols::types::{Tab, TabGroup};

use crate::palette::map_to_group_color;

const MAILBOX_CAPACITY: usize = 32;
const PORT_CAPACITY: usize = 16;

type Ports = Arc<DashMap<i64, mpsc::Sender<ExtensionPush>>>;

/// Reply to a forwarded page request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReply {
    /// Present only when the request asked for the tab list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<Tab>>,
}

impl WorkerReply {
    fn empty() -> Self {
        Self::default()
    }

    fn with_tabs(tabs: Vec<Tab>) -> Self {
        Self { tabs: Some(tabs) }
    }
}

struct WorkerCall {
    request: PageRequest,
    reply: oneshot::Sender<WorkerReply>,
}

/// Background worker driving a [`TabPlatform`].
pub struct TabRegistryWorker {
    platform: Arc<dyn TabPlatform>,
    ports: Ports,
}

impl TabRegistryWorker {
    pub fn new(platform: Arc<dyn TabPlatform>) -> Self {
        Self {
            platform,
            ports: Arc::new(DashMap::new()),
        }
    }

    /// Full tab list across all windows. Platform failures yield an empty
    /// snapshot.
    pub async fn snapshot(&self) -> Vec<Tab> {
        match self.platform.query_tabs().await {
            Ok(tabs) => tabs.iter().map(Tab::from).collect(),
            Err(e) => {
                warn!("Failed to query tabs: {}", e);
                Vec::new()
            }
        }
    }

    /// Process one page request.
    pub async fn handle(&self, request: PageRequest) -> WorkerReply {
        debug!("Worker handling {}", request.action());
        match request {
            PageRequest::GetTabs => WorkerReply::with_tabs(self.snapshot().await),
            PageRequest::TabAction(action) => {
                if let Err(e) = self.run_tab_action(action).await {
                    debug!("Tab action {:?} on {} failed: {}", action.action, action.tab_id, e);
                }
                WorkerReply::empty()
            }
            PageRequest::ApplyGroups(groups) => {
                self.apply_groups(&groups).await;
                WorkerReply::empty()
            }
            PageRequest::Ping => WorkerReply::empty(),
        }
    }

    async fn run_tab_action(&self, request: TabActionRequest) -> Result<(), PlatformError> {
        match request.action {
            TabActionKind::Close => self.platform.remove_tab(request.tab_id).await,
            TabActionKind::Focus => {
                self.platform.activate_tab(request.tab_id).await?;
                let tab = self.platform.get_tab(request.tab_id).await?;
                self.platform.focus_window(tab.window_id).await
            }
        }
    }

    /// Materialize each group independently. A failing group is logged and
    /// skipped; groups already applied stay applied.
    pub async fn apply_groups(&self, groups: &[TabGroup]) -> usize {
        let mut applied = 0;
        for group in groups {
            match self.apply_group(group).await {
                Ok(native_id) => {
                    debug!("Applied group '{}' as native group {}", group.name, native_id);
                    applied += 1;
                }
                Err(e) => warn!("Failed to apply group '{}': {}", group.name, e),
            }
        }
        info!("Applied {}/{} group(s)", applied, groups.len());
        applied
    }

    async fn apply_group(&self, group: &TabGroup) -> Result<i64, PlatformError> {
        let tab_ids: Vec<i64> = group
            .tab_ids
            .iter()
            .filter_map(|id| match id.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("Ignoring non-numeric tab id '{}' in group '{}'", id, group.name);
                    None
                }
            })
            .collect();
        let native_id = self.platform.group_tabs(&tab_ids).await?;
        self.platform
            .update_group(native_id, &group.name, map_to_group_color(&group.color))
            .await?;
        Ok(native_id)
    }

    /// Push the current snapshot to every active tab hosting a dashboard.
    pub async fn broadcast_tabs(&self) {
        if self.ports.is_empty() {
            return;
        }
        let active = match self.platform.active_tabs().await {
            Ok(active) => active,
            Err(e) => {
                warn!("Failed to query active tabs: {}", e);
                return;
            }
        };
        let targets: Vec<i64> = active
            .iter()
            .map(|t| t.id)
            .filter(|id| self.ports.contains_key(id))
            .collect();
        if targets.is_empty() {
            return;
        }

        let tabs = self.snapshot().await;
        for tab_id in targets {
            if let Some(port) = self.ports.get(&tab_id) {
                if let Err(e) = port.try_send(ExtensionPush::TabsUpdate(tabs.clone())) {
                    debug!("Dropping TABS_UPDATE for tab {}: {}", tab_id, e);
                }
            }
        }
    }

    /// Start the worker loop. It stops when `cancel` fires or every handle
    /// is dropped.
    pub fn spawn(self, cancel: CancellationToken) -> WorkerHandle {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let handle = WorkerHandle {
            calls: tx,
            ports: self.ports.clone(),
        };
        let events = self.platform.subscribe();
        tokio::spawn(self.run(rx, events, cancel));
        handle
    }

    async fn run(
        self,
        mut calls: mpsc::Receiver<WorkerCall>,
        events: broadcast::Receiver<TabEvent>,
        cancel: CancellationToken,
    ) {
        let mut events = Some(events);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                call = calls.recv() => {
                    let Some(call) = call else { break };
                    let reply = self.handle(call.request).await;
                    let _ = call.reply.send(reply);
                }
                event = next_event(&mut events) => match event {
                    Ok(event) => {
                        debug!("Tab event {:?}", event);
                        self.broadcast_tabs().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Worker lagged {} tab event(s)", skipped);
                        self.broadcast_tabs().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Tab event stream closed");
                        events = None;
                    }
                },
            }
        }
        debug!("Tab registry worker stopped");
    }
}

async fn next_event(
    events: &mut Option<broadcast::Receiver<TabEvent>>,
) -> Result<TabEvent, broadcast::error::RecvError> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Runtime-port side of a running worker.
#[derive(Clone)]
pub struct WorkerHandle {
    calls: mpsc::Sender<WorkerCall>,
    ports: Ports,
}

impl WorkerHandle {
    /// Send a request and wait for the worker's reply.
    pub async fn send_message(&self, request: PageRequest) -> Result<WorkerReply, BridgeError> {
        let (reply, rx) = oneshot::channel();
        self.calls
            .send(WorkerCall { request, reply })
            .await
            .map_err(|_| BridgeError::PortClosed("worker".to_string()))?;
        rx.await.map_err(|_| BridgeError::NoReply("worker".to_string()))
    }

    /// Open the push port for the relay hosted in `tab_id`.
    pub fn attach(&self, tab_id: i64) -> mpsc::Receiver<ExtensionPush> {
        let (tx, rx) = mpsc::channel(PORT_CAPACITY);
        self.ports.insert(tab_id, tx);
        rx
    }

    pub fn detach(&self, tab_id: i64) {
        self.ports.remove(&tab_id);
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
