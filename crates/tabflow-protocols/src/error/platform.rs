//! Native tab platform errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Tab not found: {0}")]
    TabNotFound(i64),

    #[error("Window not found: {0}")]
    WindowNotFound(i64),

    #[error("Group not found: {0}")]
    GroupNotFound(i64),

    #[error("Cannot group an empty tab list")]
    EmptyGroup,

    #[error("Platform error: {0}")]
    Other(String),
}
