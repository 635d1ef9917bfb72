//! API server state

use std::sync::Arc;

use crate::storage::QnaStore;

/// API server state, built once at startup and cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Storage handle, already connected with the schema in place
    pub store: Arc<dyn QnaStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn QnaStore>) -> Self {
        Self { store }
    }
}
