//! Persistent Cache - A two-tier TTL cache server
//!
//! Hydrates both scopes from disk at startup and snapshots them back when
//! the process is asked to stop.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use persistent_cache::api::create_router;
use persistent_cache::{spawn_sweep_task, AppState, Config};

/// Main entry point for the persistent cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open file backends and hydrate both scopes
/// 4. Start the optional TTL sweep task
/// 5. Serve the REST API until SIGINT/SIGTERM
/// 6. Flush every scope to disk before exiting
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persistent_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Persistent Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}ms, port={}, storage_dir={}, sweep_interval={}s, policy={}",
        config.default_ttl_ms,
        config.server_port,
        config.storage_dir.display(),
        config.sweep_interval,
        config.invalidation_policy
    );

    let state = AppState::from_config(&config).context("failed to open durable storage")?;
    info!("Cache scopes hydrated");

    let sweep_handle = (config.sweep_interval > 0)
        .then(|| spawn_sweep_task(state.cache.clone(), config.sweep_interval));

    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Sweep task aborted");
    }

    // Teardown: the only point where unflushed writes reach disk
    if let Err(e) = state.cache.write().await.teardown() {
        error!("Teardown flush failed: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
