use std::sync::Arc;

use crate::application::ReviewAnalysisService;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::dashboard::DashboardRenderer;

/// Shared, read-only handles given to every worker.
#[derive(Debug, Clone)]
pub struct AppState {
    pub analysis: Arc<ReviewAnalysisService>,
    pub dashboard: Arc<DashboardRenderer>,
    pub config: Arc<AppConfig>,
}
