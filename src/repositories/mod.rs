//! Repository layer for user persistence.
//!
//! The service layer only sees the [`UserStore`] trait. Two implementations
//! are provided: PostgreSQL through diesel_async, and an in-process map for
//! local runs and tests.

mod memory_user_repo;
mod user_repo;

pub use memory_user_repo::MemoryUserRepository;
pub use user_repo::PgUserRepository;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::User;

/// Storage operations the user service depends on.
///
/// Implementations must be safe to share across request tasks. No method is
/// transactional with any other; callers that chain an existence check with a
/// `save` accept the race between the two.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// All stored users, in whatever order the backend yields them.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Inserts the record, or replaces the stored record with the same id.
    async fn save(&self, user: User) -> AppResult<User>;

    /// Removes the record if present. Deleting an unknown id is not an error.
    async fn delete_by_id(&self, id: &str) -> AppResult<()>;
}
