//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and sit between the HTTP handlers
//! and the storage seam.

mod user_service;

pub use user_service::UserService;

use std::sync::Arc;

use crate::repositories::UserStore;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since every service only holds `Arc`s.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
}

impl Services {
    /// Creates the service set on top of the given user store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            users: UserService::new(store),
        }
    }
}
