use std::sync::Arc;

use crate::api::Backend;

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(api: impl Backend + 'static) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn api(&self) -> &dyn Backend {
        self.api.as_ref()
    }
}
