// Application state for HTTP handlers
use crate::application::exploration_service::ExplorationService;

#[derive(Clone)]
pub struct AppState {
    pub exploration_service: ExplorationService,
}
