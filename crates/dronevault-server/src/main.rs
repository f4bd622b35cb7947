//! Dronevault server
//!
//! Serves Drone secret requests by resolving `vault/item[/field]` paths
//! against the configured secret store.

mod config;
mod server;
mod tracing_logger;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dronevault_core::{CancellationToken, SecretResolver};
use tracing_subscriber::EnvFilter;

use config::Args;
use server::AppState;
use tracing_logger::TracingLogger;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.debug);
    args.validate()?;

    let resolver = SecretResolver::connect(&args.connect_config(), Arc::new(TracingLogger))
        .context("failed to configure secret store client")?;

    let backend = resolver.backend_name().to_string();

    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(resolver, args.secret.clone(), shutdown.clone()));
    let app = server::router(state);

    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        backend = %backend,
        store = %args.connect_host,
        timeout = ?args.connect_timeout,
        "server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Wait for Ctrl-C, then cancel in-flight resolutions
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    shutdown.cancel();
}
