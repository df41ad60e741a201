//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by the stores in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short links, click counting and aggregates
//! - [`UserRepository`] - User accounts
//! - [`ApiKeyRepository`] - Per-user API keys
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod api_key_repository;
pub mod link_repository;
pub mod user_repository;

pub use api_key_repository::ApiKeyRepository;
pub use link_repository::LinkRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use api_key_repository::MockApiKeyRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
