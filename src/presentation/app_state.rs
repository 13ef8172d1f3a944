// Application state for HTTP handlers
use std::sync::Arc;

use crate::application::panel_service::PanelService;

pub struct AppState {
    pub panels: Arc<PanelService>,
}
