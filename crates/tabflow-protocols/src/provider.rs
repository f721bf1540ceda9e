//! Model provider protocol.
//!
//! A provider performs the single remote call that partitions a tab list
//! into groups. Credential selection and retry policy live with the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::types::{AIResult, Tab};

/// HTTP header carrying a caller-owned credential on categorization
/// requests.
pub const CREDENTIAL_HEADER: &str = "X-Gemini-API-Key";

/// Outcome of one successful categorization call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub result: AIResult,
    /// Grounding citations returned by the model, if any.
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
}

/// Core trait for tab categorization backends.
#[async_trait]
pub trait TabCategorizer: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Partition `tabs` into groups using `credential` for this one call.
    async fn categorize(
        &self,
        credential: &str,
        tabs: &[Tab],
    ) -> Result<Categorization, ProviderError>;
}
