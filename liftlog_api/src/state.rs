use std::sync::Arc;

use liftlog_core::{FileStore, WorkoutService};

use crate::error::ApiError;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WorkoutService<FileStore>>,
}

impl AppState {
    pub fn new(service: WorkoutService<FileStore>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Run a service call on the blocking pool; the file store does
    /// synchronous, lock-guarded IO.
    pub async fn call<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&WorkoutService<FileStore>) -> liftlog_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let result = tokio::task::spawn_blocking(move || f(&service)).await?;
        result.map_err(ApiError::from)
    }
}
