//! Categorization stream frames.

use serde::{Deserialize, Serialize};

use super::AIResult;

/// One NDJSON frame of the categorization stream.
///
/// Tagged on `status`; the tag is validated before any case-specific field
/// is read. A request produces any number of progress frames followed by
/// exactly one terminal frame (`success` or `error`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StreamUpdate {
    Initializing {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Analyzing {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Retry {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Success {
        data: AIResult,
        /// Grounding citations, passed through untouched.
        #[serde(default)]
        sources: Vec<serde_json::Value>,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

impl StreamUpdate {
    pub fn initializing(message: impl Into<String>) -> Self {
        Self::Initializing {
            message: Some(message.into()),
        }
    }

    pub fn analyzing(message: impl Into<String>) -> Self {
        Self::Analyzing {
            message: Some(message.into()),
        }
    }

    pub fn retry(message: impl Into<String>) -> Self {
        Self::Retry {
            message: Some(message.into()),
        }
    }

    pub fn success(data: AIResult, sources: Vec<serde_json::Value>) -> Self {
        Self::Success { data, sources }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether this frame ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }

    /// The `status` tag as it appears on the wire.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Initializing { .. } => "initializing",
            Self::Analyzing { .. } => "analyzing",
            Self::Retry { .. } => "retry",
            Self::Success { .. } => "success",
            Self::Error { .. } => "error",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Initializing { message }
            | Self::Analyzing { message }
            | Self::Retry { message } => message.as_deref(),
            Self::Error { message } => Some(message.as_str()),
            Self::Success { .. } => None,
        }
    }

    /// Serialize as one NDJSON line, newline included.
    pub fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
