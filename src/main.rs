// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_context::DashboardContext;
use crate::application::json_source::JsonSource;
use crate::infrastructure::clients::build_clients;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_source::ReqwestJsonSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_panel, health_check, list_panels, request_refresh, stream_panels,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load dashboard configuration")?;

    // Create data clients (infrastructure layer)
    let source: Arc<dyn JsonSource> = Arc::new(ReqwestJsonSource::new(&config.http)?);
    let clients = build_clients(source, &config.endpoints);

    // Start the refresh pipeline (application layer)
    let context = Arc::new(DashboardContext::start(clients, config.schedules()));
    let state = Arc::new(AppState {
        context: context.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/panels", get(list_panels))
        .route("/panels/stream", get(stream_panels))
        .route("/panels/:id", get(get_panel))
        .route("/panels/:id/refresh", post(request_refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_addr))?;
    tracing::info!("Starting insights dashboard on {}", addr);

    // Stopping the dashboard first also ends open live streams
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown requested");
            context.shutdown().await;
        })
        .await?;

    Ok(())
}
