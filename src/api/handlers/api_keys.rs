//! Handlers for API key management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::api_keys::{ApiKeyCreatedResponse, ApiKeyListResponse, ApiKeyView};
use crate::api::dto::auth::MessageResponse;
use crate::api::middleware::auth::AuthUser;
use crate::application::services::account_service::api_key_not_found;
use crate::error::AppError;
use crate::state::AppState;

/// Issues a new API key. The key is only ever shown in this response.
///
/// # Endpoint
///
/// `POST /api/auth/api-keys` (session token only)
///
/// # Response
///
/// ```json
/// { "apiKey": "9f86d0...", "keyId": 4, "createdAt": "2025-01-01T00:00:00Z" }
/// ```
///
/// # Errors
///
/// Returns 409 Conflict when the caller already holds 5 keys.
pub async fn create_api_key_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<(StatusCode, Json<ApiKeyCreatedResponse>), AppError> {
    let api_key = state.account_service.create_api_key(user.user_id).await?;

    Ok((StatusCode::CREATED, Json(api_key.into())))
}

/// `GET /api/auth/api-keys` (session token only)
pub async fn list_api_keys_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiKeyListResponse>, AppError> {
    let keys = state.account_service.list_api_keys(user.user_id).await?;

    Ok(Json(ApiKeyListResponse {
        api_keys: keys.into_iter().map(ApiKeyView::from).collect(),
    }))
}

/// Revokes one of the caller's keys.
///
/// # Endpoint
///
/// `DELETE /api/auth/api-keys/{keyId}` (session token only)
///
/// # Errors
///
/// Returns 404 Not Found for an unknown id, a key owned by someone else, or
/// an id that is not a number.
pub async fn revoke_api_key_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let key_id = key_id
        .parse::<i64>()
        .map_err(|_| api_key_not_found(&key_id))?;

    state
        .account_service
        .revoke_api_key(user.user_id, key_id)
        .await?;

    Ok(Json(MessageResponse::new("API key revoked")))
}
