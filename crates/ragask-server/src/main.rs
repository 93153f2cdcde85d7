//! ragask: retrieval-augmented question answering over HTTP.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use ragask_core::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before tracing, so RUST_LOG may come from .env.
    let dotenv = ragask_core::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => info!("No .env file, using process environment"),
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    let config = ServerConfig::from_env();
    match config.upstream_timeout {
        Some(t) => info!("Upstream timeout: {}s", t.as_secs()),
        None => warn!("Upstream timeout disabled; a hung dependency hangs its request"),
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = routes::build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ragask listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
