//! Core data model.

mod result;
mod status;
mod stream;
mod tab;

pub use result::*;
pub use status::*;
pub use stream::*;
pub use tab::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
