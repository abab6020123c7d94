// Application state for HTTP handlers
use crate::application::dashboard_context::DashboardContext;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub context: Arc<DashboardContext>,
}
