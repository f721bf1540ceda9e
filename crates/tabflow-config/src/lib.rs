//! # TabFlow Config
//!
//! Configuration management for TabFlow: a TOML file with `${VAR}`
//! substitution, overlaid with environment-provided credentials.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigLoader, parse_credential_list, API_KEY_ENV};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
