//! Session token and API key authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::Credentials;
use crate::infrastructure::security::session_token::invalid_token;
use crate::{error::AppError, state::AppState};

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Identity resolved by the authentication middleware.
///
/// Inserted as a request extension; handlers take it as an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(authentication_required)
    }
}

/// Authenticates requests with either a session token or an API key.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <session token>
/// X-API-Key: <api key>
/// ```
///
/// # Selection
///
/// An `Authorization` header, when present, decides the request alone: a
/// malformed or non-Bearer value is rejected even if an API key is also sent.
/// Without it, `X-API-Key` is used.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Neither header is present
/// - The session token is malformed, forged or expired
/// - The API key is unknown
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let user_id = if parts.headers.contains_key(header::AUTHORIZATION) {
        let token = bearer_token(&mut parts).await?;
        st.auth_service
            .authenticate(Credentials::Session(&token))
            .await?
    } else if let Some(value) = parts.headers.get(API_KEY_HEADER) {
        let key = value
            .to_str()
            .map_err(|_| AppError::unauthorized("Invalid API key", json!({})))?;
        st.auth_service
            .authenticate(Credentials::ApiKey(key))
            .await?
    } else {
        return Err(authentication_required());
    };

    parts.extensions.insert(AuthUser { user_id });

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Authenticates requests with a session token only.
///
/// Used for account management, where an API key must not be enough.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the `Authorization` header is missing or the
/// token is invalid.
pub async fn session_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    if !parts.headers.contains_key(header::AUTHORIZATION) {
        return Err(authentication_required());
    }

    let token = bearer_token(&mut parts).await?;
    let user_id = st.auth_service.authenticate_session(&token)?;

    parts.extensions.insert(AuthUser { user_id });

    Ok(next.run(Request::from_parts(parts, body)).await)
}

async fn bearer_token(parts: &mut Parts) -> Result<String, AppError> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| invalid_token())?;

    Ok(token)
}

fn authentication_required() -> AppError {
    AppError::unauthorized("Authentication required", json!({}))
}
