//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tabflow_protocols::provider::TabCategorizer;

/// Application state shared across handlers.
pub struct AppState {
    pub categorizer: Arc<dyn TabCategorizer>,
    /// Server-side keys, in rotation order.
    pub api_keys: Vec<String>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(categorizer: Arc<dyn TabCategorizer>, api_keys: Vec<String>) -> Self {
        Self {
            categorizer,
            api_keys,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Increment request count.
    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCategorizer;

    fn state() -> AppState {
        AppState::new(Arc::new(ScriptedCategorizer::default()), vec!["k1".to_string()])
    }

    #[test]
    fn test_request_count() {
        let state = state();
        assert_eq!(state.request_count(), 0);

        state.increment_requests();
        state.increment_requests();
        assert_eq!(state.request_count(), 2);
    }

    #[test]
    fn test_uptime() {
        let state = state();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(state.uptime().as_millis() >= 10);
    }
}
