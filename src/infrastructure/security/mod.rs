//! Credential primitives: password hashing and signed session tokens.
//!
//! - [`password`] - Argon2id hashing and verification
//! - [`session_token`] - HS256 JWT issue and verification

pub mod password;
pub mod session_token;

pub use session_token::{SessionClaims, SessionTokens};
