//! Tab state relay.
//!
//! Sits between the page bus and the worker. Page requests are forwarded
//! one at a time in post order. Forwarding failures never escape it; the
//! page heartbeat is what notices a dead worker.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tabflow_protocols::envelope::{Envelope, ExtensionPush, PageRequest};

use crate::transport::{BridgeTags, Window, WindowListener};
use crate::worker::WorkerHandle;

const FORWARD_CAPACITY: usize = 32;

/// Content relay hosted in one dashboard tab.
#[derive(Clone)]
pub struct TabStateRelay {
    window: Window,
    tags: BridgeTags,
    worker: WorkerHandle,
    tab_id: i64,
}

impl TabStateRelay {
    pub fn new(window: Window, tags: BridgeTags, worker: WorkerHandle, tab_id: i64) -> Self {
        Self {
            window,
            tags,
            worker,
            tab_id,
        }
    }

    /// Start relaying. Both ports are opened before this returns, so
    /// anything posted afterwards is seen.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        let listener = self.window.subscribe();
        let pushes = self.worker.attach(self.tab_id);
        let (forward, requests) = mpsc::channel(FORWARD_CAPACITY);
        tokio::spawn(self.clone().forward(requests, cancel.clone()));
        tokio::spawn(self.run(listener, pushes, forward, cancel))
    }

    async fn run(
        self,
        mut listener: WindowListener,
        mut pushes: mpsc::Receiver<ExtensionPush>,
        forward: mpsc::Sender<PageRequest>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                envelope = listener.recv_from(&self.tags.page) => match envelope {
                    Ok(envelope) => self.on_page_message(envelope, &forward),
                    Err(e) => {
                        debug!("Relay stopped listening: {}", e);
                        break;
                    }
                },
                push = pushes.recv() => match push {
                    Some(push) => self.post(&push),
                    None => {
                        debug!("Worker port closed for tab {}", self.tab_id);
                        break;
                    }
                },
            }
        }
        self.worker.detach(self.tab_id);
    }

    fn on_page_message(&self, envelope: Envelope, forward: &mpsc::Sender<PageRequest>) {
        let request: PageRequest = match envelope.decode() {
            Ok(request) => request,
            Err(e) => {
                debug!("Dropping undecodable page message: {}", e);
                return;
            }
        };

        if request == PageRequest::Ping {
            self.post(&ExtensionPush::Pong);
            return;
        }

        if let Err(e) = forward.try_send(request) {
            debug!("Dropping page request for tab {}: {}", self.tab_id, e);
        }
    }

    /// Forward page requests to the worker one at a time, in post order.
    async fn forward(self, mut requests: mpsc::Receiver<PageRequest>, cancel: CancellationToken) {
        loop {
            let request = tokio::select! {
                _ = cancel.cancelled() => break,
                request = requests.recv() => match request {
                    Some(request) => request,
                    None => break,
                },
            };
            match self.worker.send_message(request).await {
                Ok(reply) => {
                    if let Some(tabs) = reply.tabs {
                        self.post(&ExtensionPush::TabsUpdate(tabs));
                    }
                }
                Err(e) => debug!("Forwarding to worker failed: {}", e),
            }
        }
    }

    fn post(&self, push: &ExtensionPush) {
        match Envelope::encode(self.tags.extension.clone(), push) {
            Ok(envelope) => {
                self.window.post(envelope);
            }
            Err(e) => debug!("Failed to encode push: {}", e),
        }
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
