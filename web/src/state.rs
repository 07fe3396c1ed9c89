//! Application state for Axum handlers.

use std::sync::Arc;
use volunteer_hub_core::{Notifier, VolunteerHub};

/// Application state shared across all HTTP handlers.
///
/// Cloned per request by Axum; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Domain service
    pub hub: VolunteerHub,
    /// Sends signup emails after a commit
    pub notifier: Arc<dyn Notifier>,
    /// Shared secret for `/api/admin` routes
    pub admin_token: Arc<str>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        hub: VolunteerHub,
        notifier: Arc<dyn Notifier>,
        admin_token: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            hub,
            notifier,
            admin_token: admin_token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Axum requires Clone + Send + Sync state
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }
}
