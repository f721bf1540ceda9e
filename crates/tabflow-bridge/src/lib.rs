//! # TabFlow Bridge
//!
//! Message relay between the dashboard page and the browser extension.
//!
//! ```text
//!  dashboard page  <--- window bus --->  content relay  <--- runtime --->  background worker
//!   (tabflow-page)                    (tabflow-extension)                   (TabPlatform)
//! ```
//!
//! - [`Window`] is the shared page bus. Every listener sees every envelope,
//!   including its own, and keeps only those from the role it expects.
//! - [`TabStateRelay`] answers `PING` itself and forwards everything else to
//!   the worker, turning tab-list replies into `TABS_UPDATE` pushes.
//! - [`TabRegistryWorker`] owns the tab list and drives the [`TabPlatform`].

mod extension;
mod memory;
mod palette;
mod relay;
mod transport;
mod worker;

pub use extension::ExtensionHost;
pub use memory::InMemoryPlatform;
pub use palette::map_to_group_color;
pub use relay::TabStateRelay;
pub use transport::{BridgeTags, Window, WindowListener};
pub use worker::{TabRegistryWorker, WorkerHandle, WorkerReply};

pub use tabflow_protocols::platform::TabPlatform;
