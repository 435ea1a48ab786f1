use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::{AppConfig, ConfigOverrides};
use crate::infrastructure::logging::init_tracing;
use crate::interfaces::http::start_server;

/// Load configuration, initialize the model and serve until shutdown.
pub async fn run(config_file: Option<&Path>, overrides: ConfigOverrides) -> anyhow::Result<()> {
    let config = AppConfig::load_with_dotenv(config_file)
        .and_then(|config| config.with_overrides(overrides))
        .context("Failed to load configuration")?;

    init_tracing(&config.logging);
    info!(
        model_path = %config.model.path.display(),
        static_dir = %config.server.static_dir.display(),
        route_prefix = %config.server.route_prefix,
        "Starting review sentiment service"
    );

    let state = bootstrap::initialize(config).context("Startup failed")?;
    let server = start_server(state).context("Failed to bind HTTP server")?;
    server.await.context("HTTP server terminated with an error")?;

    info!("Server stopped");
    Ok(())
}
