//! Extension host: wires a worker and a relay onto a page bus.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use tabflow_protocols::platform::TabPlatform;

use crate::relay::TabStateRelay;
use crate::transport::{BridgeTags, Window};
use crate::worker::{TabRegistryWorker, WorkerHandle};

/// A running extension instance serving one dashboard tab.
pub struct ExtensionHost {
    worker: WorkerHandle,
    relay: JoinHandle<()>,
    cancel: CancellationToken,
}

impl ExtensionHost {
    /// Start the background worker over `platform` and a relay for the
    /// dashboard hosted in `dashboard_tab_id`.
    pub fn install(
        platform: Arc<dyn TabPlatform>,
        window: &Window,
        tags: BridgeTags,
        dashboard_tab_id: i64,
        cancel: CancellationToken,
    ) -> Self {
        let worker = TabRegistryWorker::new(platform).spawn(cancel.child_token());
        let relay = TabStateRelay::new(window.clone(), tags, worker.clone(), dashboard_tab_id)
            .spawn(cancel.child_token());
        info!("Extension installed for dashboard tab {}", dashboard_tab_id);
        Self {
            worker,
            relay,
            cancel,
        }
    }

    pub fn worker(&self) -> &WorkerHandle {
        &self.worker
    }

    /// Stop the worker and relay and wait for the relay to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.relay.await;
    }
}
