//! Bridge transport: the shared page bus and the origin tags.

use tokio::sync::broadcast;
use tracing::{debug, warn};

use tabflow_config::BridgeConfig;
use tabflow_protocols::envelope::{Envelope, SourceTag};
use tabflow_protocols::error::BridgeError;

const WINDOW_CAPACITY: usize = 64;

/// Source tags for both sides of the page bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTags {
    pub page: SourceTag,
    pub extension: SourceTag,
}

impl Default for BridgeTags {
    fn default() -> Self {
        Self {
            page: SourceTag::page(),
            extension: SourceTag::extension(),
        }
    }
}

impl From<&BridgeConfig> for BridgeTags {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            page: SourceTag::new(config.page_source.clone()),
            extension: SourceTag::new(config.extension_source.clone()),
        }
    }
}

/// The page's message bus.
///
/// Posting is fire-and-forget: every current listener receives a copy,
/// including the poster. Nothing is queued for listeners that subscribe
/// later.
#[derive(Debug, Clone)]
pub struct Window {
    tx: broadcast::Sender<Envelope>,
}

impl Window {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(WINDOW_CAPACITY);
        Self { tx }
    }

    /// Post an envelope to every listener. Returns the number of listeners
    /// that will see it.
    pub fn post(&self, envelope: Envelope) -> usize {
        self.tx.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> WindowListener {
        WindowListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

/// One listener on the page bus.
pub struct WindowListener {
    rx: broadcast::Receiver<Envelope>,
}

impl WindowListener {
    /// Next envelope of any origin.
    pub async fn recv(&mut self) -> Result<Envelope, BridgeError> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) => return Ok(envelope),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Window listener lagged, {} envelope(s) skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(BridgeError::PortClosed("window".to_string()));
                }
            }
        }
    }

    /// Next envelope whose source is `expected`; everything else is dropped.
    pub async fn recv_from(&mut self, expected: &SourceTag) -> Result<Envelope, BridgeError> {
        loop {
            let envelope = self.recv().await?;
            if envelope.is_from(expected) {
                return Ok(envelope);
            }
            debug!(
                "Dropping {} from source {:?}, expected {}",
                envelope.action, envelope.source, expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabflow_protocols::envelope::{ExtensionPush, PageRequest};

    #[tokio::test]
    async fn test_poster_sees_own_envelope() {
        let window = Window::new();
        let mut listener = window.subscribe();

        let env = Envelope::encode(SourceTag::page(), &PageRequest::Ping).unwrap();
        assert_eq!(window.post(env.clone()), 1);
        assert_eq!(listener.recv().await.unwrap(), env);
    }

    #[tokio::test]
    async fn test_recv_from_drops_foreign_sources() {
        let window = Window::new();
        let mut listener = window.subscribe();

        window.post(Envelope::encode(SourceTag::page(), &PageRequest::GetTabs).unwrap());
        window.post(Envelope::encode(SourceTag::new("evil-extension"), &ExtensionPush::Pong).unwrap());
        window.post(Envelope::encode(SourceTag::extension(), &ExtensionPush::Pong).unwrap());

        let env = listener.recv_from(&SourceTag::extension()).await.unwrap();
        assert_eq!(env.source, SourceTag::extension());
        assert_eq!(env.action, "PONG");
    }

    #[test]
    fn test_post_without_listeners() {
        let window = Window::new();
        let env = Envelope::encode(SourceTag::page(), &PageRequest::Ping).unwrap();
        assert_eq!(window.post(env), 0);
    }

    #[test]
    fn test_tags_from_config() {
        let config = BridgeConfig {
            page_source: "p".to_string(),
            extension_source: "e".to_string(),
            heartbeat_interval_ms: 1500,
        };
        let tags = BridgeTags::from(&config);
        assert_eq!(tags.page.as_str(), "p");
        assert_eq!(tags.extension.as_str(), "e");
    }
}
