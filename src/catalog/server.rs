use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::api::{self, AppState};
use super::client::ProductsApi;
use super::session::SessionConfig;

/// Configuration for the catalog server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_url: String,
    pub api_timeout: Duration,
    pub session: SessionConfig,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_url: "http://localhost:3333".to_string(),
            api_timeout: Duration::from_secs(10),
            session: SessionConfig::default(),
            dev_mode: false,
        }
    }
}

/// Build the full application router: pages plus request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    api::page_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the catalog server and serve until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let client = Arc::new(
        ProductsApi::new(&config.api_url, config.api_timeout)
            .context("Failed to create products API client")?,
    );
    info!(api = %client.base_url(), "Using products API");

    let state = Arc::new(AppState {
        source: client.clone(),
        repository: client,
        session: config.session.clone(),
    });

    let mut app = build_router(state);

    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let host = if config.dev_mode { "0.0.0.0" } else { config.host.as_str() };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!("Vitrine running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
