//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits. PostgreSQL
//! repositories use SQLx with runtime-checked queries; [`MemoryStore`] keeps
//! everything in process for development and tests.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, lookup and click counting
//! - [`PgUserRepository`] - User accounts
//! - [`PgApiKeyRepository`] - API key storage and authentication
//! - [`MemoryStore`] - All of the above, in memory

pub mod memory_store;
pub mod pg_api_key_repository;
pub mod pg_link_repository;
pub mod pg_user_repository;

pub use memory_store::MemoryStore;
pub use pg_api_key_repository::PgApiKeyRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;
