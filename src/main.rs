// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::Parser;
use site_search::app::{create_router, AppState, VERSION};
use site_search::config::Args;
use site_search::services::logging::init_tracing;
use site_search::services::search::SearchAggregator;
use site_search::services::upstream::UpstreamClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let upstream_config = args.upstream_config()?;
    info!(
        "Using content API at {} (global search: {})",
        upstream_config.base_url, upstream_config.search_path
    );

    let upstream = UpstreamClient::new(upstream_config)?;
    let state = AppState {
        aggregator: Arc::new(SearchAggregator::new(upstream, args.search_config())),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(args.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen_addr))?;

    info!("site-search v{} listening on {}", VERSION, args.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
