//! Volunteer Hub Server
//!
//! # Usage
//!
//! ```bash
//! # In-memory store with sample data
//! SEED_SAMPLE_EVENTS=true cargo run --bin volunteer-hub
//!
//! # PostgreSQL
//! STORE_BACKEND=postgres DATABASE_URL=postgres://localhost/volunteer_hub cargo run --bin volunteer-hub
//! ```

use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use volunteer_hub_server::{Config, bootstrap, build_state};
use volunteer_hub_web::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},volunteer_hub=debug,sqlx=warn", config.server.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🤝 Starting Volunteer Hub...");
    info!(
        backend = ?config.store.backend,
        port = config.server.port,
        "Configuration loaded"
    );

    if config.uses_default_admin_token() {
        warn!(
            "ADMIN_TOKEN is not set; using the default admin token. Set ADMIN_TOKEN in production"
        );
    }

    bootstrap::install_metrics_exporter(&config)?;

    let state = build_state(&config).await?;
    let app = build_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "🤝 Volunteer Hub listening");

    let (signal_tx, mut signal_rx) = tokio::sync::watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                bootstrap::shutdown_signal().await;
                let _ = signal_tx.send(true);
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        _ = signal_rx.changed() => {}
    }

    // Give in-flight requests a bounded time to finish.
    let drain = Duration::from_secs(config.server.shutdown_timeout);
    match tokio::time::timeout(drain, server).await {
        Ok(result) => result??,
        Err(_) => warn!(seconds = drain.as_secs(), "Graceful shutdown timed out"),
    }

    info!("Shutdown complete");
    Ok(())
}
