//! # TabFlow Dashboard
//!
//! Page-side half of TabFlow, without any rendering.
//!
//! - [`ConnectionMonitor`] and [`Heartbeat`] track whether the extension
//!   is reachable over the page bus.
//! - [`CategorizeClient`] posts the tab list to the categorization endpoint
//!   and decodes the NDJSON reply with [`NdjsonDecoder`].
//! - [`resolve_groups`] turns positional results into [`TabGroup`]s.
//! - [`DashboardSession`] ties these together for one page lifetime.
//!
//! [`TabGroup`]: tabflow_protocols::TabGroup

mod client;
mod credential;
mod groups;
mod monitor;
mod ndjson;
mod session;
mod views;

pub use client::{CategorizeClient, UpdateStream};
pub use credential::{CategorizeOptions, CredentialProvider};
pub use groups::resolve_groups;
pub use monitor::{ConnectionMonitor, Heartbeat};
pub use ndjson::NdjsonDecoder;
pub use session::{DashboardSession, OrganizeOutcome};
pub use views::{filter_tabs, grouped_tab_ids, ungrouped_tabs};
