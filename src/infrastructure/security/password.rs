//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) that embed their salt and
//! parameters. Both functions are CPU bound; async callers should run them on
//! `tokio::task::spawn_blocking`.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde_json::json;

use crate::error::AppError;

/// Hashes a password with a fresh random salt.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })
}

/// Verifies a password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only a corrupt stored hash is an error.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if `password_hash` is not a valid PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        AppError::internal(
            "Invalid stored password hash",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();

        assert_ne!(a, b);
        assert!(verify_password("same", &a).unwrap());
        assert!(verify_password("same", &b).unwrap());
    }

    #[test]
    fn test_never_contains_plaintext() {
        let hash = hash_password("plaintext-password").unwrap();
        assert!(!hash.contains("plaintext-password"));
    }

    #[test]
    fn test_corrupt_hash_is_error() {
        let result = verify_password("secret", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
