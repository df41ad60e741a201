//! Handler for link shortening endpoint.

use axum::{Json, extract::State};

use crate::api::dto::links::{Envelope, LinkView, ShortenRequest};
use crate::api::extract::ValidatedJson;
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::RequestOrigin;

/// Creates a short link for the caller, or returns the one they already have.
///
/// # Endpoint
///
/// `POST /api/shorten` (session token or API key)
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 1,
///     "originalUrl": "https://example.com",
///     "urlCode": "Xy3_k9Qa",
///     "shortUrl": "http://localhost:3000/api/Xy3_k9Qa",
///     "qrCode": "data:image/svg+xml;base64,...",
///     "clicks": 0,
///     ...
///   },
///   "message": "URL shortened successfully"
/// }
/// ```
///
/// Resubmitting a URL the caller already shortened returns the existing link
/// with message `"URL already exists"`.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing or not an absolute http(s) URL.
pub async fn shorten_handler(
    State(state): State<AppState>,
    user: AuthUser,
    origin: RequestOrigin,
    ValidatedJson(payload): ValidatedJson<ShortenRequest>,
) -> Result<Json<Envelope<LinkView>>, AppError> {
    let outcome = state
        .link_service
        .shorten(&payload.original_url, user.user_id, origin)
        .await?;

    let message = if outcome.created {
        "URL shortened successfully"
    } else {
        "URL already exists"
    };

    Ok(Json(Envelope::with_message(outcome.link.into(), message)))
}
