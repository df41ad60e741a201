//! Handler for the caller's link history.

use axum::{Json, extract::State};

use crate::api::dto::links::{Envelope, HistoryItem};
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/history` (session token or API key)
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": [
///     {
///       "id": 3,
///       "originalUrl": "https://example.com",
///       "shortUrl": "http://localhost:3000/api/Xy3_k9Qa",
///       "createdAt": "2025-01-01T00:00:00Z",
///       "clicks": 4,
///       "qrCode": "data:image/svg+xml;base64,..."
///     }
///   ]
/// }
/// ```
pub async fn history_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<Vec<HistoryItem>>>, AppError> {
    let links = state.link_service.history(user.user_id).await?;

    Ok(Json(Envelope::ok(
        links.into_iter().map(HistoryItem::from).collect(),
    )))
}
