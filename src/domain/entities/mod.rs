//! Core domain entities.
//!
//! - [`User`] - A registered account
//! - [`ApiKey`] - A long-lived credential owned by a user
//! - [`Link`] - A shortened URL with its QR code and click counter
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewUser`, `NewLink`) and partial updates (`ProfilePatch`).

pub mod api_key;
pub mod link;
pub mod user;

pub use api_key::{ApiKey, MAX_API_KEYS_PER_USER};
pub use link::{Link, NewLink};
pub use user::{NewUser, ProfilePatch, User};
