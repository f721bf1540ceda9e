use super::*;
use std::time::Duration;

use serde_json::json;
use tabflow_bridge::{ExtensionHost, InMemoryPlatform, TabPlatform};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

const HEARTBEAT: Duration = Duration::from_millis(20);

struct Fixture {
    platform: Arc<InMemoryPlatform>,
    session: DashboardSession,
    _host: ExtensionHost,
    _server: MockServer,
}

/// Three tabs in window 1, with the dashboard itself as tab "1".
async fn fixture(server: MockServer) -> Fixture {
    let window = Window::new();
    let tags = BridgeTags::default();
    let platform = Arc::new(InMemoryPlatform::new());
    let dashboard = platform.open_tab(1, "chrome-extension://tabflow/index.html", "TabFlow");
    platform.open_tab(2, "https://amazon.com/mouse", "Wireless Mouse");
    platform.open_tab(2, "https://react.dev/learn", "React Docs");
    platform.activate_tab(dashboard).await.unwrap();

    let host = ExtensionHost::install(
        platform.clone(),
        &window,
        tags.clone(),
        dashboard,
        CancellationToken::new(),
    );
    let client = CategorizeClient::new(format!("{}/api/categorize", server.uri())).unwrap();
    let session = DashboardSession::start(window, tags, client, HEARTBEAT);

    Fixture {
        platform,
        session,
        _host: host,
        _server: server,
    }
}

async fn wait_for_tabs(session: &DashboardSession, count: usize) {
    let mut rx = session.subscribe_tabs();
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|tabs| tabs.len() == count))
        .await
        .expect("tab snapshot never arrived")
        .unwrap();
}

fn success_body(groups: serde_json::Value) -> String {
    format!(
        "{}\n{}\n",
        json!({"status": "analyzing", "message": "Using system key (Rotation 1/1)..."}),
        json!({"status": "success", "data": {"groups": groups}, "sources": []})
    )
}

async fn mount_success(server: &MockServer, groups: serde_json::Value, delay: Duration) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/categorize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(success_body(groups), "application/x-ndjson")
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_heartbeat_connects_and_syncs_tabs() {
    let f = fixture(MockServer::start().await).await;
    assert_eq!(f.session.status(), ConnectionStatus::Disconnected);

    wait_for_tabs(&f.session, 3).await;

    assert_eq!(f.session.status(), ConnectionStatus::Connected);
    let ids: Vec<String> = f.session.tabs().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_tab_changes_replace_snapshot() {
    let f = fixture(MockServer::start().await).await;
    wait_for_tabs(&f.session, 3).await;
    let before = f.session.tabs();

    f.platform.open_tab(2, "https://docs.rs", "Docs.rs");
    wait_for_tabs(&f.session, 4).await;

    assert_eq!(before.len(), 3);
    assert_eq!(f.session.tabs()[3].title, "Docs.rs");
}

#[tokio::test]
async fn test_close_action_reaches_platform() {
    let f = fixture(MockServer::start().await).await;
    wait_for_tabs(&f.session, 3).await;

    assert!(f.session.tab_action(TabActionKind::Close, "2"));
    wait_for_tabs(&f.session, 2).await;
    assert!(f.platform.get_tab(2).await.is_err());

    assert!(!f.session.tab_action(TabActionKind::Close, "not-a-tab"));
}

#[tokio::test]
async fn test_organize_with_no_tabs_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let client = CategorizeClient::new(format!("{}/api/categorize", server.uri())).unwrap();
    let session = DashboardSession::start(Window::new(), BridgeTags::default(), client, HEARTBEAT);

    let outcome = session.organize(CategorizeOptions::new(), |_| {}).await;
    assert_eq!(outcome, OrganizeOutcome::Skipped);
}

#[tokio::test]
async fn test_organize_applies_groups_by_position() {
    let server = MockServer::start().await;
    mount_success(
        &server,
        json!([{"name": "Dev", "description": "d", "color": "#111", "tabIndices": [0, 2]}]),
        Duration::ZERO,
    )
    .await;
    let f = fixture(server).await;
    wait_for_tabs(&f.session, 3).await;

    let mut statuses = Vec::new();
    let outcome = f
        .session
        .organize(CategorizeOptions::new(), |u| statuses.push(u.status()))
        .await;

    let groups = match outcome {
        OrganizeOutcome::Applied(groups) => groups,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(statuses, vec!["initializing", "analyzing", "success"]);
    assert_eq!(groups[0].tab_ids, vec!["1", "3"]);
    assert_eq!(f.session.groups().as_ref(), &groups);

    let ungrouped: Vec<String> = f.session.ungrouped_tabs("").into_iter().map(|t| t.id).collect();
    assert_eq!(ungrouped, vec!["2"]);

    // APPLY_GROUPS reaches the platform.
    let mut applied = Vec::new();
    for _ in 0..100 {
        applied = f.platform.groups();
        if !applied.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].title, "Dev");
    assert_eq!(applied[0].tab_ids, vec![1, 3]);
}

#[tokio::test]
async fn test_organize_reports_error_frame() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "No API key available."})))
        .mount(&server)
        .await;
    let f = fixture(server).await;
    wait_for_tabs(&f.session, 3).await;

    let outcome = f.session.organize(CategorizeOptions::new(), |_| {}).await;

    match outcome {
        OrganizeOutcome::Failed(message) => assert!(message.contains("No API key available.")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(f.session.groups().is_empty());
}

#[tokio::test]
async fn test_newer_request_supersedes_older() {
    let server = MockServer::start().await;
    mount_success(
        &server,
        json!([{"name": "Dev", "description": "d", "color": "#111", "tabIndices": [0]}]),
        Duration::from_millis(200),
    )
    .await;
    let f = fixture(server).await;
    wait_for_tabs(&f.session, 3).await;

    let (first, second) = tokio::join!(
        f.session.organize(CategorizeOptions::new(), |_| {}),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            f.session.organize(CategorizeOptions::new(), |_| {}).await
        }
    );

    assert_eq!(first, OrganizeOutcome::Superseded);
    assert!(matches!(second, OrganizeOutcome::Applied(_)));
}

#[tokio::test]
async fn test_request_tabs_marks_connecting() {
    let session = DashboardSession::start(
        Window::new(),
        BridgeTags::default(),
        CategorizeClient::new("http://127.0.0.1:1/api/categorize").unwrap(),
        Duration::from_secs(60),
    );

    session.request_tabs();
    assert_eq!(session.status(), ConnectionStatus::Connecting);
}
