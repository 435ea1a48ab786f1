use std::sync::Arc;

use tracing::{error, info};

use crate::application::ReviewAnalysisService;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::model::ModelGateway;
use crate::interfaces::dashboard::DashboardRenderer;
use crate::interfaces::state::AppState;

/// Load the classifier and build the shared request state.
///
/// Runs once before the server binds; any failure here aborts startup.
pub fn initialize(config: AppConfig) -> Result<AppState> {
    let gateway = ModelGateway::load(&config.model.path).map_err(|err| {
        error!(
            error = %err,
            model_path = %config.model.path.display(),
            "Failed to load model artifact"
        );
        err
    })?;

    let dashboard = DashboardRenderer::new().map_err(|err| {
        error!(error = %err, "Failed to register dashboard template");
        err
    })?;

    if !config.server.static_dir.join("index.html").is_file() {
        info!(
            static_dir = %config.server.static_dir.display(),
            "No client bundle found; unmatched paths will return 404"
        );
    }

    let analysis = ReviewAnalysisService::from_config(&config, gateway);
    Ok(AppState {
        analysis: Arc::new(analysis),
        dashboard: Arc::new(dashboard),
        config: Arc::new(config),
    })
}
