//! Application state for Axum web framework.

use std::sync::Arc;

use crate::repositories::UserStore;
use crate::services::Services;

/// Shared state handed to every request handler.
///
/// Cloning is cheap since the services only hold `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Builds the service set on top of `store` and wraps it.
    ///
    /// # Example
    /// ```ignore
    /// let store = Arc::new(MemoryUserRepository::new());
    /// let state = AppState::from_store(store);
    /// ```
    pub fn from_store(store: Arc<dyn UserStore>) -> Self {
        Self::new(Services::new(store))
    }
}
