//! In-process user repository.
//!
//! Keeps records in a concurrent map keyed by id. Like the `users_email_key`
//! and `users_username_key` indexes on PostgreSQL, `save` refuses a record
//! whose email or username is held by a different id.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::UserStore;
use crate::error::{AppError, AppResult};
use crate::models::User;

/// Map-backed [`UserStore`]. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<DashMap<String, User>>,
    /// Serializes saves so the uniqueness check and the insert cannot interleave.
    write_lock: Arc<Mutex<()>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn find_first(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_first(|user| user.email == email))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.find_first(|user| user.username == username))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.users.iter().any(|entry| entry.value().email == email))
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.iter().any(|entry| entry.value().username == username))
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let _guard = self.write_lock.lock().await;

        let held_by_other = |predicate: &dyn Fn(&User) -> bool| {
            self.users
                .iter()
                .any(|entry| entry.key() != &user.id && predicate(entry.value()))
        };
        if held_by_other(&|other: &User| other.email == user.email) {
            return Err(AppError::duplicate_user("email", &user.email));
        }
        if held_by_other(&|other: &User| other.username == user.username) {
            return Err(AppError::duplicate_user("username", &user.username));
        }

        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        self.users.remove(id);
        Ok(())
    }
}
