//! Caller credential selection.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use tabflow_protocols::error::PipelineError;

/// Host capability that can hand the dashboard a user-owned credential.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether the user already picked a credential.
    async fn has_credential(&self) -> bool;

    /// The user's credential.
    async fn select_credential(&self) -> Result<String, PipelineError>;
}

/// Per-request options for a categorization call.
///
/// An explicit `credential` wins over the `capability`. With neither, the
/// request carries no credential and the server uses its own keys.
#[derive(Clone, Default)]
pub struct CategorizeOptions {
    pub credential: Option<String>,
    pub capability: Option<Arc<dyn CredentialProvider>>,
}

impl CategorizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_capability(mut self, capability: Arc<dyn CredentialProvider>) -> Self {
        self.capability = Some(capability);
        self
    }

    /// The credential to send, if any.
    pub async fn resolve(&self) -> Result<Option<String>, PipelineError> {
        if let Some(credential) = self.credential.as_deref().map(str::trim) {
            if !credential.is_empty() {
                return Ok(Some(credential.to_string()));
            }
        }
        match &self.capability {
            Some(capability) if capability.has_credential().await => {
                let credential = capability.select_credential().await?;
                let credential = credential.trim();
                Ok((!credential.is_empty()).then(|| credential.to_string()))
            }
            _ => Ok(None),
        }
    }
}

impl fmt::Debug for CategorizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategorizeOptions")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("capability", &self.capability.is_some())
            .finish()
    }
}
