//! `serve` command: run the categorization server.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use tabflow_api::{ApiConfig, ApiServer, AppState};
use tabflow_config::{Config, ConfigLoader, ConfigValidator};
use tabflow_provider_gemini::{GeminiCategorizer, GeminiOptions};

pub(crate) async fn run(
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting TabFlow v{}", env!("CARGO_PKG_VERSION"));

    let mut config = ConfigLoader::load_or_default(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for e in &validation.errors {
            error!("Config {}: {}", e.path, e.message);
        }
        return Err(format!("invalid configuration in {}", config_path.display()).into());
    }

    let state = Arc::new(build_state(&config)?);
    let server = ApiServer::new(ApiConfig::from(&config.server), state);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await
}

fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let options = GeminiOptions {
        model: config.gemini.model.clone(),
        grounding: config.gemini.grounding,
        min_groups: config.gemini.min_groups,
        max_groups: config.gemini.max_groups,
    };
    info!(
        "Using model {} with {} server credential(s)",
        options.model,
        config.credentials.api_keys.len()
    );
    let categorizer = GeminiCategorizer::with_base_url(config.gemini.base_url.clone(), options)?;
    Ok(AppState::new(
        Arc::new(categorizer),
        config.credentials.api_keys.clone(),
    ))
}
