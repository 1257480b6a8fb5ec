//! User service for business logic operations.
//!
//! Holds the two uniqueness rules applied on create and the selective merge
//! applied on update. Everything else passes straight through to the store.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{User, UserPatch};
use crate::repositories::UserStore;

/// User service for handling user-related business logic.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new UserService over the given store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Gets a user by id. `None` means no such user.
    pub async fn get_user(&self, id: &str) -> AppResult<Option<User>> {
        self.store.find_by_id(id).await
    }

    /// Gets a user by email address.
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.store.find_by_email(email).await
    }

    /// Gets a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.store.find_by_username(username).await
    }

    /// Lists all users, unpaginated.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.find_all().await
    }

    /// Creates a new user.
    ///
    /// The email check runs first; if it fails the username is not checked.
    ///
    /// # Errors
    /// `Duplicate` on `email`, then on `username`.
    pub async fn create_user(&self, candidate: User) -> AppResult<User> {
        if self.store.exists_by_email(&candidate.email).await? {
            tracing::info!(email = %candidate.email, "Rejected user with duplicate email");
            return Err(AppError::duplicate_user("email", &candidate.email));
        }
        if self.store.exists_by_username(&candidate.username).await? {
            tracing::info!(username = %candidate.username, "Rejected user with duplicate username");
            return Err(AppError::duplicate_user("username", &candidate.username));
        }

        let user = self.store.save(candidate).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Applies a partial update to an existing user.
    ///
    /// # Errors
    /// `NotFound` if no user has this id; nothing is written in that case.
    pub async fn update_user(&self, id: &str, patch: UserPatch) -> AppResult<User> {
        let mut user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))?;

        user.apply_patch(patch);
        let user = self.store.save(user).await?;
        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Deletes a user. Unknown ids are silently accepted.
    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.store.delete_by_id(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryUserRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store wrapper that counts writes.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryUserRepository,
        saves: AtomicUsize,
        deletes: AtomicUsize,
        username_checks: AtomicUsize,
    }

    #[async_trait]
    impl UserStore for CountingStore {
        async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
            self.inner.find_by_username(username).await
        }

        async fn find_all(&self) -> AppResult<Vec<User>> {
            self.inner.find_all().await
        }

        async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
            self.inner.exists_by_email(email).await
        }

        async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
            self.username_checks.fetch_add(1, Ordering::SeqCst);
            self.inner.exists_by_username(username).await
        }

        async fn save(&self, user: User) -> AppResult<User> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(user).await
        }

        async fn delete_by_id(&self, id: &str) -> AppResult<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_by_id(id).await
        }
    }

    fn candidate(id: &str, email: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            elo: Some(1000),
            tier: Some("Bronze".to_string()),
            total_matches: Some(0),
            wins: Some(0),
            avatar: None,
        }
    }

    fn service() -> (UserService, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        (UserService::new(store.clone()), store)
    }

    fn assert_duplicate(result: AppResult<User>, expected_field: &str) {
        match result {
            Err(AppError::Duplicate { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected Duplicate on {}, got {:?}", expected_field, other),
        }
    }

    #[tokio::test]
    async fn test_create_returns_input_fields() {
        let (service, _) = service();
        let input = candidate("u-1", "a@x.com", "a");

        let created = service.create_user(input.clone()).await.unwrap();
        assert_eq!(created, input);
        assert_eq!(service.get_user("u-1").await.unwrap(), Some(input));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_regardless_of_username() {
        let (service, store) = service();
        service.create_user(candidate("u-1", "a@x.com", "a")).await.unwrap();

        let result = service.create_user(candidate("u-2", "a@x.com", "other")).await;
        assert_duplicate(result, "email");

        let result = service.create_user(candidate("u-3", "a@x.com", "a")).await;
        assert_duplicate(result, "email");

        // Email failure short-circuits the username check
        assert_eq!(store.username_checks.load(Ordering::SeqCst), 1);
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let (service, store) = service();
        service.create_user(candidate("u-1", "a@x.com", "a")).await.unwrap();

        let result = service.create_user(candidate("u-2", "b@x.com", "a")).await;
        assert_duplicate(result, "username");
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_single_field_leaves_others() {
        let (service, _) = service();
        let original = service
            .create_user(candidate("u-1", "a@x.com", "a"))
            .await
            .unwrap();

        let updated = service
            .update_user(
                "u-1",
                UserPatch {
                    elo: Some(1500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.elo, Some(1500));
        assert_eq!(User { elo: original.elo, ..updated.clone() }, original);
        assert_eq!(service.get_user("u-1").await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_missing_user_does_not_write() {
        let (service, store) = service();

        let result = service
            .update_user(
                "ghost",
                UserPatch {
                    username: Some("ghost".to_string()),
                    ..Default::default()
                },
            )
            .await;

        match result {
            Err(AppError::NotFound { entity, value, .. }) => {
                assert_eq!(entity, "user");
                assert_eq!(value, "ghost");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (service, store) = service();
        service.create_user(candidate("u-1", "a@x.com", "a")).await.unwrap();

        service.delete_user("u-1").await.unwrap();
        service.delete_user("u-1").await.unwrap();
        service.delete_user("never-existed").await.unwrap();

        assert_eq!(store.deletes.load(Ordering::SeqCst), 3);
        assert_eq!(service.get_user("u-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookups_by_email_and_username() {
        let (service, _) = service();
        service.create_user(candidate("u-1", "a@x.com", "a")).await.unwrap();
        service.create_user(candidate("u-2", "b@x.com", "b")).await.unwrap();

        let by_email = service.get_user_by_email("b@x.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some("u-2".to_string()));

        let by_username = service.get_user_by_username("a").await.unwrap();
        assert_eq!(by_username.map(|u| u.id), Some("u-1".to_string()));

        assert!(service.get_user_by_email("c@x.com").await.unwrap().is_none());
        assert_eq!(service.list_users().await.unwrap().len(), 2);
    }
}
