use std::sync::Arc;

use crate::store::RateStore;

/// Shared application state, passed to all route handlers via `axum::extract::State`
pub struct AppState {
    /// Rate storage; handlers re-read it on every request
    pub store: Arc<dyn RateStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RateStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }
}
