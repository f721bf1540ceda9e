use super::*;
use std::sync::Arc;
use std::time::Duration;

use tabflow_protocols::envelope::{SourceTag, TabActionKind, TabActionRequest};
use tabflow_protocols::types::{Tab, TabGroup};

use crate::memory::InMemoryPlatform;
use crate::worker::TabRegistryWorker;

struct Harness {
    window: Window,
    tags: BridgeTags,
    platform: Arc<InMemoryPlatform>,
    page: WindowListener,
    cancel: CancellationToken,
}

impl Harness {
    fn start() -> Self {
        let window = Window::new();
        let tags = BridgeTags::default();
        let platform = Arc::new(InMemoryPlatform::new());
        let dashboard = platform.open_tab(1, "chrome-extension://tabflow/index.html", "TabFlow");
        platform.open_tab(2, "https://github.com", "GitHub");

        let cancel = CancellationToken::new();
        let worker = TabRegistryWorker::new(platform.clone()).spawn(cancel.clone());
        TabStateRelay::new(window.clone(), tags.clone(), worker, dashboard).spawn(cancel.clone());

        let page = window.subscribe();
        Self {
            window,
            tags,
            platform,
            page,
            cancel,
        }
    }

    fn send(&self, request: &PageRequest) {
        self.window
            .post(Envelope::encode(self.tags.page.clone(), request).unwrap());
    }

    async fn next_push(&mut self) -> ExtensionPush {
        let envelope = tokio::time::timeout(
            Duration::from_secs(1),
            self.page.recv_from(&self.tags.extension),
        )
        .await
        .expect("no push within a second")
        .unwrap();
        envelope.decode().unwrap()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn tab_ids(tabs: &[Tab]) -> Vec<&str> {
    tabs.iter().map(|t| t.id.as_str()).collect()
}

#[tokio::test]
async fn test_ping_answered_with_pong() {
    let mut harness = Harness::start();
    harness.send(&PageRequest::Ping);
    assert_eq!(harness.next_push().await, ExtensionPush::Pong);
}

#[tokio::test]
async fn test_get_tabs_becomes_tabs_update() {
    let mut harness = Harness::start();
    harness.send(&PageRequest::GetTabs);

    match harness.next_push().await {
        ExtensionPush::TabsUpdate(tabs) => assert_eq!(tab_ids(&tabs), vec!["1", "2"]),
        other => panic!("unexpected push: {:?}", other),
    }
}

#[tokio::test]
async fn test_foreign_source_is_ignored() {
    let mut harness = Harness::start();
    harness
        .window
        .post(Envelope::encode(SourceTag::new("some-other-page"), &PageRequest::Ping).unwrap());
    harness.send(&PageRequest::GetTabs);

    // The first extension message must answer GET_TABS, not the forged PING.
    assert!(matches!(harness.next_push().await, ExtensionPush::TabsUpdate(_)));
}

#[tokio::test]
async fn test_close_action_pushes_fresh_snapshot() {
    let mut harness = Harness::start();
    harness.send(&PageRequest::TabAction(TabActionRequest {
        action: TabActionKind::Close,
        tab_id: 2,
    }));

    // Removal triggers a push to the active dashboard tab.
    match harness.next_push().await {
        ExtensionPush::TabsUpdate(tabs) => assert_eq!(tab_ids(&tabs), vec!["1"]),
        other => panic!("unexpected push: {:?}", other),
    }
}

#[tokio::test]
async fn test_tab_created_is_pushed_unsolicited() {
    let mut harness = Harness::start();
    harness.platform.open_tab(2, "https://docs.rs", "Docs.rs");

    match harness.next_push().await {
        ExtensionPush::TabsUpdate(tabs) => assert_eq!(tabs.len(), 3),
        other => panic!("unexpected push: {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_request_is_dropped() {
    let mut harness = Harness::start();
    harness.window.post(Envelope {
        source: harness.tags.page.clone(),
        action: "TAB_ACTION".to_string(),
        data: Some(serde_json::json!({"action": "EXPLODE"})),
    });
    harness.send(&PageRequest::Ping);

    assert_eq!(harness.next_push().await, ExtensionPush::Pong);
}

#[tokio::test]
async fn test_requests_reach_worker_in_post_order() {
    for _ in 0..20 {
        let mut harness = Harness::start();
        harness.send(&PageRequest::ApplyGroups(vec![TabGroup {
            id: "group-0-1".to_string(),
            name: "Code".to_string(),
            description: String::new(),
            color: "#3b82f6".to_string(),
            tab_ids: vec!["2".to_string()],
        }]));
        harness.send(&PageRequest::GetTabs);

        match harness.next_push().await {
            ExtensionPush::TabsUpdate(tabs) => {
                let github = tabs.iter().find(|t| t.id == "2").unwrap();
                assert!(github.group_id.is_some());
            }
            other => panic!("unexpected push: {:?}", other),
        }
    }
}
