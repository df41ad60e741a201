//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /api/{code}`
///
/// # Request Flow
///
/// 1. Atomically increment the click counter and refresh `lastAccessed`
/// 2. Return 302 Found with `Location` set to the original URL
///
/// The click is committed before the response is sent.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist; nothing is counted.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let link = state.link_service.redirect(&code).await?;

    let location = location_header(&link.original_url)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds a `Location` value, falling back to the percent-encoded form for
/// URLs containing characters a header cannot carry.
fn location_header(target: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(target) {
        return Ok(value);
    }

    Url::parse(target)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "url": target }),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_header_plain_url() {
        let value = location_header("https://example.com/a?b=1").unwrap();
        assert_eq!(value, "https://example.com/a?b=1");
    }

    #[test]
    fn test_location_header_encodes_non_ascii() {
        let value = location_header("https://example.com/caf\u{e9}").unwrap();
        assert_eq!(value, "https://example.com/caf%C3%A9");
    }
}
