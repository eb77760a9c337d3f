//! HTTP service mode.
//!
//! This module provides:
//! - Configuration types (`config`)
//! - The axum router and handlers (`http`)
//! - HTTP error mapping (`error`)
//! - [`serve`], which binds and runs until Ctrl-C

pub mod config;
pub mod error;
pub mod http;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::{MultirouteError, Result};

pub use error::ApiError;
pub use http::{AppState, api_router, build_router};

/// Bind to the configured address and serve until Ctrl-C.
pub async fn serve(config: &config::Config, state: AppState) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| MultirouteError::Configuration(format!("Invalid address: {e}")))?;

    let router = build_router(state, &config.server);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| MultirouteError::Configuration(format!("Failed to bind to {addr}: {e}")))?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MultirouteError::Http(format!("Server error: {e}")))?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
