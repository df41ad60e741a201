//! Domain layer containing business entities and repository contracts.
//!
//! The domain layer has no dependency on HTTP or on a particular database.
//!
//! # Architecture
//!
//! - [`entities`] - Users, API keys and short links
//! - [`repositories`] - Data access trait definitions
//!
//! Business rules live in [`crate::application::services`]; concrete stores live in
//! [`crate::infrastructure::persistence`].

pub mod entities;
pub mod repositories;
