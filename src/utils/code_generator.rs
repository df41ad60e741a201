//! Random token generation for short codes and API keys.
//!
//! Both generators draw from the operating system RNG via `getrandom`.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Length of random bytes before base64 encoding (6 bytes -> 8 characters).
const CODE_LENGTH_BYTES: usize = 6;

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 8;

/// Random bytes in an API key (hex encoded to 64 characters).
const API_KEY_BYTES: usize = 32;

fn random_bytes<const N: usize>() -> Result<[u8; N], AppError> {
    let mut buffer = [0u8; N];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(buffer)
}

/// Generates a random 8-character short code.
///
/// Encodes 48 random bits as URL-safe base64 without padding, so the alphabet is
/// `[A-Za-z0-9_-]`.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system RNG fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 8);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_code() -> Result<String, AppError> {
    let buffer = random_bytes::<CODE_LENGTH_BYTES>()?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Generates a new API key: 32 random bytes, lowercase hex encoded.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system RNG fails.
pub fn generate_api_key() -> Result<String, AppError> {
    let buffer = random_bytes::<API_KEY_BYTES>()?;
    Ok(hex::encode(buffer))
}
