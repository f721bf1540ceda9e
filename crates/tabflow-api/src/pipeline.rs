//! Server half of the categorization pipeline: credential rotation.
//!
//! Credentials are tried strictly one after another. A quota failure moves
//! on to the next configured key; any other failure, or a quota failure on
//! the last key, ends the stream with an error frame. A caller-supplied key
//! is the only key tried.

use std::sync::Arc;

use futures::Stream;
use tracing::{error, info, warn};

use tabflow_protocols::provider::TabCategorizer;
use tabflow_protocols::types::{StreamUpdate, Tab};

pub const CALLER_KEY_MESSAGE: &str = "Using your personal API key...";
pub const RETRY_MESSAGE: &str = "Quota exhausted. Rotating keys...";
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to process request.";

/// Which credentials one request may use, in order.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialPlan {
    /// Supplied with the request. Never rotated, never mixed with server keys.
    Caller(String),
    /// Server-configured keys, tried in order.
    Rotation(Vec<String>),
}

impl CredentialPlan {
    /// A non-blank caller credential wins over the configured list.
    pub fn resolve(caller: Option<&str>, configured: &[String]) -> Self {
        match caller.map(str::trim).filter(|c| !c.is_empty()) {
            Some(caller) => CredentialPlan::Caller(caller.to_string()),
            None => CredentialPlan::Rotation(
                configured
                    .iter()
                    .map(|k| k.trim())
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CredentialPlan::Caller(_) => 1,
            CredentialPlan::Rotation(keys) => keys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn progress_message(&self, attempt: usize) -> String {
        match self {
            CredentialPlan::Caller(_) => CALLER_KEY_MESSAGE.to_string(),
            CredentialPlan::Rotation(keys) => {
                format!("Using system key (Rotation {}/{})...", attempt + 1, keys.len())
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        match self {
            CredentialPlan::Caller(key) => vec![key.clone()],
            CredentialPlan::Rotation(keys) => keys.clone(),
        }
    }
}

impl std::fmt::Debug for CredentialPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialPlan::Caller(_) => f.write_str("Caller(<redacted>)"),
            CredentialPlan::Rotation(keys) => write!(f, "Rotation({} key(s))", keys.len()),
        }
    }
}

/// Run `plan` against `categorizer`, yielding one `analyzing` frame per
/// attempt, a `retry` frame before each rotation and exactly one terminal
/// frame.
pub fn categorize_stream(
    categorizer: Arc<dyn TabCategorizer>,
    plan: CredentialPlan,
    tabs: Vec<Tab>,
) -> impl Stream<Item = StreamUpdate> + Send + 'static {
    async_stream::stream! {
        let rotating = matches!(plan, CredentialPlan::Rotation(_));
        let keys = plan.keys();
        let mut last_error: Option<String> = None;

        for (attempt, key) in keys.iter().enumerate() {
            info!(
                "Categorizing {} tab(s) with {}, attempt {}/{}",
                tabs.len(),
                categorizer.id(),
                attempt + 1,
                keys.len()
            );
            yield StreamUpdate::analyzing(plan.progress_message(attempt));

            match categorizer.categorize(key, &tabs).await {
                Ok(categorization) => {
                    info!(
                        "Categorization produced {} group(s)",
                        categorization.result.groups.len()
                    );
                    yield StreamUpdate::success(categorization.result, categorization.sources);
                    return;
                }
                Err(e) => {
                    let rotate = rotating && e.is_quota_exhausted() && attempt + 1 < keys.len();
                    warn!("Attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e.to_string());
                    if !rotate {
                        break;
                    }
                    info!("Quota exhausted, rotating to key {}/{}", attempt + 2, keys.len());
                    yield StreamUpdate::retry(RETRY_MESSAGE);
                }
            }
        }

        let message = last_error.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
        error!("Categorization failed: {}", message);
        yield StreamUpdate::error(message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
