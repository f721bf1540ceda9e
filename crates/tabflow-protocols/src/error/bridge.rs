//! Bridge transport errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to encode message: {0}")]
    Encode(String),

    #[error("Failed to decode {action}: {message}")]
    Decode { action: String, message: String },

    #[error("Port closed: {0}")]
    PortClosed(String),

    #[error("No reply from {0}")]
    NoReply(String),
}
