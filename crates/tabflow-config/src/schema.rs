//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

/// HTTP categorization server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser. Empty allows any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Server-side model credentials, tried in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub api_keys: Vec<String>,
}

impl CredentialsConfig {
    pub fn is_empty(&self) -> bool {
        self.api_keys.is_empty()
    }
}

/// Gemini model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Attach the search tool so the model can cite sources.
    #[serde(default = "default_true")]
    pub grounding: bool,

    #[serde(default = "default_min_groups")]
    pub min_groups: u32,

    #[serde(default = "default_max_groups")]
    pub max_groups: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            grounding: true,
            min_groups: default_min_groups(),
            max_groups: default_max_groups(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_groups() -> u32 {
    4
}

fn default_max_groups() -> u32 {
    6
}

/// Bridge transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_page_source")]
    pub page_source: String,

    #[serde(default = "default_extension_source")]
    pub extension_source: String,

    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            page_source: default_page_source(),
            extension_source: default_extension_source(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
        }
    }
}

fn default_page_source() -> String {
    "tabflow-page".to_string()
}

fn default_extension_source() -> String {
    "tabflow-extension".to_string()
}

fn default_heartbeat_interval_ms() -> u64 {
    1500
}

/// Dashboard-side client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/api/categorize".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
