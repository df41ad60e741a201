//! Signed session tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user id.
    pub sub: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies session tokens with a server-side secret.
///
/// Constructed once from [`crate::config::Config`] and shared by the
/// authenticator and the account service.
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionTokens {
    /// Creates a token issuer.
    ///
    /// # Arguments
    ///
    /// - `secret` - HMAC key used to sign and verify tokens
    /// - `ttl` - validity period of issued tokens
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Validity period of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `user_id`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if it were created at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails.
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal(
                "Failed to issue session token",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// Verifies a token and returns the user id it was issued for.
    ///
    /// Signature, expiry and claim errors are deliberately collapsed into one
    /// [`AppError::Unauthorized`] so responses do not reveal why a token failed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for any invalid token.
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!(error = %e, "Session token rejected");
                invalid_token()
            },
        )?;

        data.claims.sub.parse::<i64>().map_err(|_| invalid_token())
    }
}

/// The single error returned for every rejected session token.
pub fn invalid_token() -> AppError {
    AppError::unauthorized("Invalid token", json!({}))
}
