//! Scripted categorizer for pipeline and route tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use tabflow_protocols::error::ProviderError;
use tabflow_protocols::provider::{Categorization, TabCategorizer};
use tabflow_protocols::types::{AIGroup, AIResult, Tab};

/// Replays queued outcomes and records the credential of every call.
#[derive(Default)]
pub struct ScriptedCategorizer {
    outcomes: Mutex<VecDeque<Result<Categorization, ProviderError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCategorizer {
    pub fn new(outcomes: Vec<Result<Categorization, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TabCategorizer for ScriptedCategorizer {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn categorize(&self, credential: &str, _tabs: &[Tab]) -> Result<Categorization, ProviderError> {
        self.calls.lock().unwrap().push(credential.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("no scripted outcome".to_string())))
    }
}

pub fn dev_group() -> Categorization {
    Categorization {
        result: AIResult {
            groups: vec![AIGroup::new("Dev", "#111", vec![0, 2]).with_description("d")],
        },
        sources: vec![serde_json::json!({"web": {"uri": "https://react.dev"}})],
    }
}

pub fn quota_error() -> ProviderError {
    ProviderError::RateLimited("429 Too Many Requests".to_string())
}

pub fn sample_tabs() -> Vec<Tab> {
    vec![
        Tab::new("1", "https://react.dev", "React"),
        Tab::new("2", "https://amazon.com", "Amazon"),
        Tab::new("3", "https://stackoverflow.com", "Stack Overflow"),
    ]
}
