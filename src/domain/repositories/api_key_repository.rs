//! Repository trait for per-user API keys.

use crate::domain::entities::ApiKey;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for API key management and lookup.
///
/// Key values are unique across all users, so a key resolves to at most one owner.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgApiKeyRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_api_key.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Stores a new key for a user, enforcing the per-user cap.
    ///
    /// The cap check and the insert are atomic: two concurrent creates can never
    /// push a user past `max_keys`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the user already holds `max_keys` keys
    /// or the key value is already in use.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, user_id: i64, key: &str, max_keys: usize) -> Result<ApiKey, AppError>;

    /// Lists a user's keys, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ApiKey>, AppError>;

    /// Deletes a key owned by `user_id`.
    ///
    /// Returns `false` if no such key exists for that user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, user_id: i64, key_id: i64) -> Result<bool, AppError>;

    /// Resolves a raw key to its owner and stamps `last_used`.
    ///
    /// Returns the owning user id, or `None` for an unknown key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn authenticate(&self, key: &str) -> Result<Option<i64>, AppError>;
}
