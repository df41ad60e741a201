//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde with camelCase field names. Request bodies are validated
//! with `validator` through [`crate::api::extract::ValidatedJson`].

pub mod api_keys;
pub mod auth;
pub mod health;
pub mod links;
