//! `categorize` command: drive a categorization from the command line.
//!
//! With a tabs file the frames are printed as NDJSON, one per line. Without
//! one an in-memory window is seeded with sample tabs and organized through
//! the full bridge, ending with the groups applied to that window.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use tabflow_bridge::{BridgeTags, ExtensionHost, InMemoryPlatform, Window};
use tabflow_config::{Config, ConfigLoader};
use tabflow_dashboard::{CategorizeClient, CategorizeOptions, DashboardSession, OrganizeOutcome};
use tabflow_protocols::types::{StreamUpdate, Tab};

const DEMO_WINDOW: i64 = 1;
const DASHBOARD_WINDOW: i64 = 2;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const DEMO_TABS: [(&str, &str); 8] = [
    ("https://react.dev", "React Documentation"),
    ("https://github.com/google/generative-ai-js", "GitHub: Gemini API"),
    ("https://amazon.com/mouse", "Amazon: Wireless Mouse"),
    ("https://youtube.com/watch?v=123", "YouTube: Tailwind CSS Tutorial"),
    ("https://stackoverflow.com/questions/hooks", "Stack Overflow: React Hooks"),
    ("https://netflix.com/title/80057281", "Netflix: Stranger Things"),
    ("https://linear.app/team", "Linear: Project Management"),
    ("https://figma.com/file/xyz", "Figma: Design System"),
];

pub(crate) async fn run(
    config_path: &Path,
    tabs_file: Option<PathBuf>,
    api_key: Option<String>,
    endpoint: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(config_path)?;
    let endpoint = endpoint.unwrap_or_else(|| config.client.endpoint.clone());
    let client = CategorizeClient::new(endpoint)?;

    let mut options = CategorizeOptions::new();
    if let Some(key) = api_key {
        options = options.with_credential(key);
    }

    match tabs_file {
        Some(path) => categorize_file(&client, &path, options).await,
        None => organize_demo(&config, client, options).await,
    }
}

async fn categorize_file(
    client: &CategorizeClient,
    path: &Path,
    options: CategorizeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let tabs: Vec<Tab> = serde_json::from_str(&content)?;
    info!("Read {} tab(s) from {}", tabs.len(), path.display());

    let mut frames = client.categorize(tabs, options);
    let mut failed = None;
    while let Some(frame) = frames.next().await {
        println!("{}", frame.to_ndjson_line()?.trim_end());
        if let StreamUpdate::Error { message } = &frame {
            failed = Some(message.clone());
        }
    }

    match failed {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}

async fn organize_demo(
    config: &Config,
    client: CategorizeClient,
    options: CategorizeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let platform = Arc::new(InMemoryPlatform::new());
    for (url, title) in DEMO_TABS {
        platform.open_tab(DEMO_WINDOW, url, title);
    }
    let dashboard_tab = platform.open_tab(DASHBOARD_WINDOW, "tabflow://dashboard", "TabFlow");

    let window = Window::new();
    let tags = BridgeTags::from(&config.bridge);
    let cancel = CancellationToken::new();
    let host = ExtensionHost::install(
        platform.clone(),
        &window,
        tags.clone(),
        dashboard_tab,
        cancel.clone(),
    );

    let session = DashboardSession::start(
        window,
        tags,
        client,
        Duration::from_millis(config.bridge.heartbeat_interval_ms),
    );
    let mut tabs = session.subscribe_tabs();
    tokio::time::timeout(CONNECT_TIMEOUT, tabs.wait_for(|tabs| !tabs.is_empty()))
        .await
        .map_err(|_| "extension did not report any tabs")??;
    info!("Connected, {} tab(s) open", session.tabs().len());

    let outcome = session
        .organize(options, |frame| match frame.message() {
            Some(message) => println!("[{}] {}", frame.status(), message),
            None => println!("[{}]", frame.status()),
        })
        .await;

    let result = match outcome {
        OrganizeOutcome::Applied(groups) => {
            for group in &groups {
                println!("{} ({}) - {}", group.name, group.color, group.description);
                for id in &group.tab_ids {
                    let title = session
                        .tabs()
                        .iter()
                        .find(|tab| &tab.id == id)
                        .map(|tab| tab.title.clone())
                        .unwrap_or_else(|| id.clone());
                    println!("    {}", title);
                }
            }
            // Let the worker finish applying before the platform is read.
            tokio::time::sleep(Duration::from_millis(100)).await;
            info!("{} native group(s) in the window", platform.groups().len());
            Ok(())
        }
        OrganizeOutcome::Failed(message) => Err(message.into()),
        other => {
            warn!("Organize finished without groups: {:?}", other);
            Ok(())
        }
    };

    drop(session);
    host.shutdown().await;
    result
}
