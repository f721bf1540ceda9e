//! Client-side categorization pipeline errors.
//!
//! These never reach the caller of the pipeline directly; they are turned
//! into a terminal error frame at the pipeline boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Server responded with {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Stream interrupted: {0}")]
    Stream(String),

    #[error("Stream ended without a result")]
    Incomplete,

    #[error("Credential lookup failed: {0}")]
    Credential(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = PipelineError::Http {
            status: 500,
            message: "No API key available".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("500"));
        assert!(display.contains("No API key available"));
    }

    #[test]
    fn test_incomplete_display() {
        assert_eq!(
            PipelineError::Incomplete.to_string(),
            "Stream ended without a result"
        );
    }
}
