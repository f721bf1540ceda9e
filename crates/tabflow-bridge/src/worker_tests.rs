use super::*;
use std::time::Duration;

use tabflow_protocols::platform::GroupColor;

use crate::memory::InMemoryPlatform;

fn platform_with_tabs() -> Arc<InMemoryPlatform> {
    let platform = Arc::new(InMemoryPlatform::new());
    platform.open_tab(1, "https://github.com", "GitHub");
    platform.open_tab(1, "https://docs.rs", "Docs.rs");
    platform.open_tab(2, "https://news.ycombinator.com", "Hacker News");
    platform
}

fn group(name: &str, color: &str, tab_ids: &[&str]) -> TabGroup {
    TabGroup {
        id: format!("group-{}", name),
        name: name.to_string(),
        description: String::new(),
        color: color.to_string(),
        tab_ids: tab_ids.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_get_tabs_returns_snapshot() {
    let worker = TabRegistryWorker::new(platform_with_tabs());

    let reply = worker.handle(PageRequest::GetTabs).await;
    let tabs = reply.tabs.unwrap();

    assert_eq!(tabs.len(), 3);
    assert_eq!(tabs[0].id, "1");
    assert_eq!(tabs[0].title, "GitHub");
    assert_eq!(tabs[2].url, "https://news.ycombinator.com");
}

#[tokio::test]
async fn test_get_tabs_is_idempotent() {
    let worker = TabRegistryWorker::new(platform_with_tabs());

    let first = worker.handle(PageRequest::GetTabs).await;
    let second = worker.handle(PageRequest::GetTabs).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_get_tabs_with_no_tabs() {
    let worker = TabRegistryWorker::new(Arc::new(InMemoryPlatform::new()));

    let reply = worker.handle(PageRequest::GetTabs).await;
    assert_eq!(reply.tabs, Some(Vec::new()));
}

#[tokio::test]
async fn test_close_removes_tab() {
    let platform = platform_with_tabs();
    let worker = TabRegistryWorker::new(platform.clone());

    let reply = worker
        .handle(PageRequest::TabAction(TabActionRequest {
            action: TabActionKind::Close,
            tab_id: 2,
        }))
        .await;

    assert!(reply.tabs.is_none());
    let ids: Vec<i64> = platform.query_tabs().await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_focus_activates_tab_and_window() {
    let platform = platform_with_tabs();
    let worker = TabRegistryWorker::new(platform.clone());

    worker
        .handle(PageRequest::TabAction(TabActionRequest {
            action: TabActionKind::Focus,
            tab_id: 1,
        }))
        .await;

    assert!(platform.get_tab(1).await.unwrap().active);
    assert!(!platform.get_tab(2).await.unwrap().active);
    assert_eq!(platform.focused_window(), Some(1));
}

#[tokio::test]
async fn test_tab_action_on_unknown_tab_is_silent() {
    let platform = platform_with_tabs();
    let worker = TabRegistryWorker::new(platform.clone());

    let reply = worker
        .handle(PageRequest::TabAction(TabActionRequest {
            action: TabActionKind::Focus,
            tab_id: 404,
        }))
        .await;

    assert_eq!(reply, WorkerReply::default());
    assert_eq!(platform.focused_window(), None);
}

#[tokio::test]
async fn test_apply_groups_labels_native_groups() {
    let platform = platform_with_tabs();
    let worker = TabRegistryWorker::new(platform.clone());

    let applied = worker
        .apply_groups(&[group("Dev", "#3b82f6", &["1", "2"]), group("News", "#ef4444", &["3"])])
        .await;

    assert_eq!(applied, 2);
    let groups = platform.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].title, "Dev");
    assert_eq!(groups[0].color, Some(GroupColor::Blue));
    assert_eq!(groups[0].tab_ids, vec![1, 2]);
    assert_eq!(groups[1].title, "News");
    assert_eq!(groups[1].color, Some(GroupColor::Red));
}

#[tokio::test]
async fn test_apply_groups_partial_failure_keeps_others() {
    let platform = platform_with_tabs();
    let worker = TabRegistryWorker::new(platform.clone());

    let applied = worker
        .apply_groups(&[
            group("Ghost", "#10b981", &["99"]),
            group("Empty", "#10b981", &[]),
            group("Junk", "#10b981", &["not-a-number"]),
            group("Dev", "not a color", &["1"]),
        ])
        .await;

    assert_eq!(applied, 1);
    let groups = platform.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].title, "Dev");
    assert!(groups[0].color.is_some());
}

#[tokio::test]
async fn test_send_message_round_trip() {
    let cancel = CancellationToken::new();
    let handle = TabRegistryWorker::new(platform_with_tabs()).spawn(cancel.clone());

    let reply = handle.send_message(PageRequest::GetTabs).await.unwrap();
    assert_eq!(reply.tabs.map(|t| t.len()), Some(3));

    cancel.cancel();
}

#[tokio::test]
async fn test_send_message_after_cancel_fails() {
    let cancel = CancellationToken::new();
    let handle = TabRegistryWorker::new(platform_with_tabs()).spawn(cancel.clone());
    cancel.cancel();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let err = handle.send_message(PageRequest::GetTabs).await.unwrap_err();
    assert!(matches!(err, BridgeError::PortClosed(_) | BridgeError::NoReply(_)));
}

#[tokio::test]
async fn test_tab_event_pushes_to_active_dashboard_only() {
    let platform = Arc::new(InMemoryPlatform::new());
    let dashboard = platform.open_tab(1, "chrome-extension://tabflow/index.html", "TabFlow");
    let background = platform.open_tab(2, "https://example.com", "Example");
    platform.activate_tab(background).await.unwrap();

    let cancel = CancellationToken::new();
    let handle = TabRegistryWorker::new(platform.clone()).spawn(cancel.clone());
    let mut dashboard_port = handle.attach(dashboard);
    let mut inactive_port = handle.attach(9999);

    platform.open_tab(2, "https://rust-lang.org", "Rust");

    let push = tokio::time::timeout(Duration::from_secs(1), dashboard_port.recv())
        .await
        .unwrap()
        .unwrap();
    match push {
        ExtensionPush::TabsUpdate(tabs) => assert_eq!(tabs.len(), 3),
        other => panic!("unexpected push: {:?}", other),
    }
    assert!(inactive_port.try_recv().is_err());

    cancel.cancel();
}

#[tokio::test]
async fn test_detach_stops_pushes() {
    let platform = Arc::new(InMemoryPlatform::new());
    let dashboard = platform.open_tab(1, "chrome-extension://tabflow/index.html", "TabFlow");

    let cancel = CancellationToken::new();
    let handle = TabRegistryWorker::new(platform.clone()).spawn(cancel.clone());
    let mut port = handle.attach(dashboard);
    handle.detach(dashboard);

    platform.set_title(dashboard, "Renamed").unwrap();

    assert!(port.recv().await.is_none());
    cancel.cancel();
}
