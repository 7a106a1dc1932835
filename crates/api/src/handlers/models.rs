use mdimg_manager::ImageManager;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub(super) manager: Arc<ImageManager>,
}
