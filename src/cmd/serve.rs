//! Catalog server command — `vitrine serve`.

use anyhow::Result;
use tracing::warn;

use vitrine::catalog::server::start_server;
use vitrine::config::AppConfig;
use vitrine::telemetry::init_tracing;

use super::super::Cli;

pub async fn cmd_serve(
    cli: &Cli,
    port: Option<u16>,
    api_url: Option<String>,
    open: bool,
    dev: bool,
) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(api_url) = api_url {
        config.api.base_url = api_url;
    }
    config.validate()?;

    init_tracing(config.logging.format, &config.logging.filter, cli.verbose)?;

    // Skip in dev mode (no browser inside containers)
    if open && !dev {
        let url = format!("http://localhost:{}", config.server.port);
        tokio::spawn(async move {
            // Small delay to let the server start binding
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                warn!(error = %e, "Failed to open browser");
            }
        });
    }

    start_server(config.server_config(dev)).await
}
