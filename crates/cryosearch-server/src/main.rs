//! cryosearch-server
//!
//! Serves the compound search API from a datastore dump.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cryosearch::{CompoundSearcher, InMemoryStore, init_logging};
use cryosearch_server::{ServerConfig, create_app};
use tracing::{info, warn};

async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(config.log_level)?;

    if let Err(errors) = config.validate() {
        anyhow::bail!("Invalid configuration: {}", errors.join("; "));
    }

    let store = InMemoryStore::from_dump(&config.data)
        .with_context(|| format!("Failed to load datastore dump {}", config.data.display()))?;
    let searcher = CompoundSearcher::with_config(Arc::new(store), config.searcher_config());

    let app = create_app(Arc::new(searcher), config.clone());
    serve(app, &config).await
}
