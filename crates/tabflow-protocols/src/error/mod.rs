//! Error types for the TabFlow protocol layer.

mod bridge;
mod pipeline;
mod platform;
mod provider;

pub use bridge::*;
pub use pipeline::*;
pub use platform::*;
pub use provider::*;
