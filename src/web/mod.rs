//! # HTTP Server
//!
//! Serves the dashboard under `/gcpstatus`:
//! - `/gcpstatus/` - BigQuery datasets, with table and schema drill-down
//! - `/gcpstatus/topics`, `/gcpstatus/subscriptions` - Pub/Sub
//! - `/gcpstatus/gke/...` - deployments, pods, images and namespaces
//! - `/gcpstatus/composer`, `/gcpstatus/environment(s)/...` - Composer
//! - `/gcpstatus/healthz` - liveness probe

pub mod error;
pub mod handlers;
pub mod render;

use crate::config::Config;
use crate::gcp::client::GcpClient;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Per-process state shared by all handlers (read-only)
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gcp: GcpClient,
}

impl AppState {
    pub fn new(config: Config, gcp: GcpClient) -> Self {
        Self {
            config: Arc::new(config),
            gcp,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let handler_timeout = state.config.handler_timeout();

    Router::new()
        .route("/gcpstatus/", get(handlers::list_datasets))
        .route("/gcpstatus/tables/{project}/{dataset_id}", get(handlers::list_tables))
        .route(
            "/gcpstatus/schema/{project}/{dataset_id}/{table_id}",
            get(handlers::show_schema),
        )
        .route("/gcpstatus/topics", get(handlers::list_topics))
        .route("/gcpstatus/subscriptions", get(handlers::list_subscriptions))
        .route("/gcpstatus/gke/deployments", get(handlers::list_deployments))
        .route("/gcpstatus/gke/pods/{deployment_name}", get(handlers::show_pods))
        .route("/gcpstatus/gke/releases/{deployment_name}", get(handlers::show_releases))
        .route("/gcpstatus/gke/namespaces", get(handlers::list_namespaces))
        .route(
            "/gcpstatus/environments/{project_id}/{location}",
            get(handlers::list_environments_json),
        )
        .route(
            "/gcpstatus/environment/{project_id}/{location}/{environment_name}",
            get(handlers::environment_details),
        )
        .route("/gcpstatus/composer", get(handlers::composer_index))
        .route("/gcpstatus/healthz", get(handlers::healthz))
        .layer(TimeoutLayer::new(handler_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_address.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
