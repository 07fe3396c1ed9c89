//! Volunteer Hub server.
//!
//! Wires configuration, the event store, notifiers and the HTTP router
//! together. The binary in `main.rs` only adds tracing and the listener.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod config;
pub mod notify;
pub mod seed;

pub use config::Config;

use std::sync::Arc;
use volunteer_hub_core::VolunteerHub;
use volunteer_hub_core::environment::SystemClock;
use volunteer_hub_web::AppState;

/// Build the application state from configuration.
///
/// Seeds sample events when configured to.
///
/// # Errors
///
/// Returns an error if the store or notifier cannot be set up.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store = bootstrap::build_store(config).await?;
    let hub = VolunteerHub::new(store, Arc::new(SystemClock), config.hub_config());
    let notifier = notify::build_notifier(&config.email)?;

    if config.seed_sample_events {
        let seeded = seed::seed_if_empty(&hub).await?;
        tracing::info!(seeded, "Sample data check complete");
    }

    Ok(AppState::new(hub, notifier, config.admin_token.as_str()))
}
