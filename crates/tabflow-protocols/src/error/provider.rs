//! Model provider errors.

use thiserror::Error;

/// Substrings that mark a failure as quota or rate-limit exhaustion.
const QUOTA_MARKERS: [&str; 4] = ["429", "Quota", "quota", "RESOURCE_EXHAUSTED"];

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Classify an HTTP error response from the model API.
    pub fn from_api_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ProviderError::AuthenticationFailed(message),
            429 => ProviderError::RateLimited(message),
            400 => ProviderError::InvalidRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }

    /// Whether another credential might succeed where this one failed.
    pub fn is_quota_exhausted(&self) -> bool {
        if matches!(self, ProviderError::RateLimited(_)) {
            return true;
        }
        let text = self.to_string();
        QUOTA_MARKERS.iter().any(|marker| text.contains(marker))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
