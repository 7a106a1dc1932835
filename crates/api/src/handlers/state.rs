use super::models::AppState;
use mdimg_manager::ImageManager;
use axum::extract::FromRef;
use std::sync::Arc;

impl AppState {
    pub fn new(manager: Arc<ImageManager>) -> Self {
        Self { manager }
    }
}

impl FromRef<AppState> for Arc<ImageManager> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.manager)
    }
}
