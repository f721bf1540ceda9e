//! Cross-context message envelope.
//!
//! Every message exchanged between the dashboard page, the content relay and
//! the background worker is wrapped as `{source, action, data?}`. Listeners
//! discard anything whose `source` is not the sender role they expect; that
//! check is the only authentication the bridge has.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BridgeError;
use crate::types::{Tab, TabGroup};

/// Tag identifying which role sent an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTag(String);

impl SourceTag {
    /// Default tag for messages posted by the dashboard page.
    pub const PAGE: &'static str = "tabflow-page";
    /// Default tag for messages posted by the extension relay.
    pub const EXTENSION: &'static str = "tabflow-extension";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn page() -> Self {
        Self::new(Self::PAGE)
    }

    pub fn extension() -> Self {
        Self::new(Self::EXTENSION)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw envelope as it travels between contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub source: SourceTag,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Wrap a typed message. The message must serialize as `{action, data?}`.
    pub fn encode<T: Serialize>(source: SourceTag, message: &T) -> Result<Self, BridgeError> {
        let value = serde_json::to_value(message).map_err(|e| BridgeError::Encode(e.to_string()))?;
        let Value::Object(mut fields) = value else {
            return Err(BridgeError::Encode("message is not an object".to_string()));
        };
        let action = match fields.remove("action") {
            Some(Value::String(action)) => action,
            _ => return Err(BridgeError::Encode("message has no action".to_string())),
        };
        Ok(Self {
            source,
            action,
            data: fields.remove("data"),
        })
    }

    /// Whether this envelope claims to come from `expected`.
    pub fn is_from(&self, expected: &SourceTag) -> bool {
        &self.source == expected
    }

    /// Decode the action and payload into a typed message.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BridgeError> {
        let mut fields = Map::new();
        fields.insert("action".to_string(), Value::String(self.action.clone()));
        if let Some(data) = &self.data {
            fields.insert("data".to_string(), data.clone());
        }
        serde_json::from_value(Value::Object(fields)).map_err(|e| BridgeError::Decode {
            action: self.action.clone(),
            message: e.to_string(),
        })
    }
}

/// Requests posted by the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageRequest {
    /// Liveness probe, answered by the relay itself.
    Ping,
    GetTabs,
    TabAction(TabActionRequest),
    ApplyGroups(Vec<TabGroup>),
}

impl PageRequest {
    pub fn action(&self) -> &'static str {
        match self {
            PageRequest::Ping => "PING",
            PageRequest::GetTabs => "GET_TABS",
            PageRequest::TabAction(_) => "TAB_ACTION",
            PageRequest::ApplyGroups(_) => "APPLY_GROUPS",
        }
    }
}

/// Messages pushed by the extension to the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtensionPush {
    Pong,
    TabsUpdate(Vec<Tab>),
}

/// Payload of a `TAB_ACTION` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabActionRequest {
    pub action: TabActionKind,
    pub tab_id: i64,
}

/// What to do with a single tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TabActionKind {
    Close,
    Focus,
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
