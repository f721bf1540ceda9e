//! # TabFlow Protocols
//!
//! Shared definitions for the TabFlow system. Contains only data shapes and
//! interface definitions - no implementations.
//!
//! ## Contents
//!
//! - [`Tab`], [`TabGroup`], [`AIResult`] - the data model
//! - [`StreamUpdate`] - one NDJSON frame of the categorization stream
//! - [`Envelope`] - the cross-context message wrapper used by the bridge
//! - [`TabCategorizer`] - trait for the remote model call
//! - [`TabPlatform`] - trait for the browser's native tab API

pub mod envelope;
pub mod error;
pub mod platform;
pub mod provider;
pub mod types;

pub use envelope::{Envelope, ExtensionPush, PageRequest, SourceTag, TabActionKind, TabActionRequest};
pub use error::{BridgeError, PipelineError, PlatformError, ProviderError};
pub use platform::{GroupColor, NativeTab, TabEvent, TabPlatform};
pub use provider::{Categorization, TabCategorizer, CREDENTIAL_HEADER};
pub use types::*;
