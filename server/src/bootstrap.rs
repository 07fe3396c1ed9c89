//! Startup wiring: store selection, metrics exporter, shutdown signal.

use crate::config::{Config, StoreBackend};
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use volunteer_hub_core::{EventStore, InMemoryEventStore};
use volunteer_hub_postgres::PostgresEventStore;

/// Open the configured event store.
///
/// # Errors
///
/// Returns an error if `PostgreSQL` cannot be reached or migrated.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn EventStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory event store (data is lost on restart)");
            Ok(Arc::new(InMemoryEventStore::new()))
        }
        StoreBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let store = PostgresEventStore::connect(
                &config.store.database_url,
                config.store.max_connections,
                Duration::from_secs(config.store.connect_timeout),
            )
            .await
            .context("failed to connect to PostgreSQL")?;

            store.migrate().await.context("failed to run migrations")?;
            info!("✓ PostgreSQL event store ready");
            Ok(Arc::new(store))
        }
    }
}

/// Start the Prometheus exporter when `METRICS_PORT` is set.
///
/// # Errors
///
/// Returns an error if the exporter cannot bind its port.
pub fn install_metrics_exporter(config: &Config) -> anyhow::Result<()> {
    volunteer_hub_core::metrics::register_metrics();

    let Some(port) = config.server.metrics_port else {
        return Ok(());
    };

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("failed to install Prometheus exporter")?;

    info!(port, "✓ Prometheus metrics available at /metrics");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
