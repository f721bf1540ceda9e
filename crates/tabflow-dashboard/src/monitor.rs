//! Extension liveness tracking.
//!
//! ```text
//!  disconnected --PONG--> connected --TABS_UPDATE--> connected
//!       |                    ^
//!    refresh                 |
//!       v                  PONG
//!   connecting --------------+
//! ```
//!
//! There is no timeout: a missing `PONG` never moves the state.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tabflow_bridge::{BridgeTags, Window};
use tabflow_protocols::envelope::{Envelope, PageRequest};
use tabflow_protocols::types::ConnectionStatus;

/// Connection state machine fed by bridge replies.
#[derive(Debug)]
pub struct ConnectionMonitor {
    status: watch::Sender<ConnectionStatus>,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);
        Self { status }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Record a `PONG`. Returns `true` when this connects, meaning the tab
    /// list must be fetched again.
    pub fn on_pong(&self) -> bool {
        let connected = self.transition(ConnectionStatus::Connected);
        if connected {
            debug!("Extension connected");
        }
        connected
    }

    /// Record a `TABS_UPDATE`.
    pub fn on_tabs_update(&self) {
        self.transition(ConnectionStatus::Connected);
    }

    /// Record an explicit refresh. Only moves a disconnected monitor.
    pub fn on_refresh(&self) -> bool {
        self.status.send_if_modified(|status| {
            if *status == ConnectionStatus::Disconnected {
                *status = ConnectionStatus::Connecting;
                true
            } else {
                false
            }
        })
    }

    fn transition(&self, next: ConnectionStatus) -> bool {
        self.status.send_if_modified(|status| {
            if *status == next {
                false
            } else {
                *status = next;
                true
            }
        })
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic `PING` sender. Stops when dropped or when its token fires.
pub struct Heartbeat {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Heartbeat {
    /// Post a `PING` tagged `tags.page` every `period`, starting now.
    pub fn spawn(window: Window, tags: &BridgeTags, period: Duration, cancel: CancellationToken) -> Self {
        let source = tags.page.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let ping = match Envelope::encode(source, &PageRequest::Ping) {
                Ok(ping) => ping,
                Err(e) => {
                    debug!("Heartbeat disabled: {}", e);
                    return;
                }
            };
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        window.post(ping.clone());
                    }
                }
            }
            debug!("Heartbeat stopped");
        });
        Self { cancel, task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
