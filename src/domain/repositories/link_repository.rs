//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link unless its code is already taken.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if the link was stored
    /// - `Ok(None)` if another link already uses `new_link.url_code`; nothing is written
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the owner already has a link for the same
    /// original URL (a concurrent create won the race).
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Option<Link>, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds the owner's link for an exact original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_owner_and_url(
        &self,
        user_id: i64,
        original_url: &str,
    ) -> Result<Option<Link>, AppError>;

    /// Lists all links owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError>;

    /// Atomically increments the click counter and refreshes `last_accessed`.
    ///
    /// Returns the updated link, or `None` when no link has this code. An unknown
    /// code mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_click(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Counts all links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Sums click counters across all links; `0` when there are no links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn total_clicks(&self) -> Result<i64, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store does not answer.
    async fn ping(&self) -> Result<(), AppError>;
}
