//! API route configuration.
//!
//! Routes are grouped by the credential they require; the top-level router in
//! [`crate::routes`] attaches the matching authentication middleware.

use crate::api::handlers::{
    change_password_handler, create_api_key_handler, history_handler, list_api_keys_handler,
    login_handler, metrics_handler, profile_handler, redirect_handler, register_handler,
    revoke_api_key_handler, shorten_handler, stats_handler, update_profile_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Account routes, protected by session token authentication only.
///
/// # Endpoints
///
/// - `GET    /auth/me`                - Caller's profile
/// - `PUT    /auth/me`                - Update name and/or email
/// - `PUT    /auth/me/password`       - Change password
/// - `GET    /auth/api-keys`          - List API keys
/// - `POST   /auth/api-keys`          - Issue an API key
/// - `DELETE /auth/api-keys/{key_id}` - Revoke an API key
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(profile_handler).put(update_profile_handler))
        .route("/auth/me/password", put(change_password_handler))
        .route(
            "/auth/api-keys",
            get(list_api_keys_handler).post(create_api_key_handler),
        )
        .route("/auth/api-keys/{key_id}", delete(revoke_api_key_handler))
}

/// Link routes, protected by session token or API key.
///
/// # Endpoints
///
/// - `POST /shorten` - Shorten a URL
/// - `GET  /history` - Caller's links, newest first
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/history", get(history_handler))
}

/// Routes that need no credential.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account
/// - `POST /auth/login`    - Obtain a session token
/// - `GET  /metrics`       - Aggregate counters
/// - `GET  /stats/{code}`  - Full record of a short link
/// - `GET  /{code}`        - Redirect to the original URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/metrics", get(metrics_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/{code}", get(redirect_handler))
}
