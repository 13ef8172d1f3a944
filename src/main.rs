// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::panel_service::PanelService;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::http_gateway::HttpGateway;
use crate::infrastructure::panel_store::JsonPanelStore;
use crate::infrastructure::proxy::proxy_router;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_panel, health_check, list_panels, panel_state, refresh_panel, remove_panel, stream_panel,
    toggle_fullscreen,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_settings()?;

    // Infrastructure layer
    let store = Arc::new(JsonPanelStore::new(&settings.storage.panels_path));
    let gateway = Arc::new(HttpGateway::new(&settings.upstreams));

    // Application layer: one poller per configured panel
    let panels = Arc::new(PanelService::new(store, gateway));
    panels.start()?;

    let state = Arc::new(AppState { panels });

    // Build router (presentation layer), with the credential-injecting proxy
    // routes merged in for browser clients
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/panels", get(list_panels).post(add_panel))
        .route("/panels/:id", delete(remove_panel))
        .route("/panels/:id/state", get(panel_state))
        .route("/panels/:id/stream", get(stream_panel))
        .route("/panels/:id/refresh", post(refresh_panel))
        .route("/panels/:id/fullscreen", post(toggle_fullscreen))
        .with_state(state)
        .merge(proxy_router(&settings.upstreams))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = settings.server.listen.parse()?;
    tracing::info!("starting ops-telemetry on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
