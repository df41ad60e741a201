//! Handler for public link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::links::{Envelope, LinkView};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the full record of a short link, including its click count.
///
/// # Endpoint
///
/// `GET /api/stats/{code}` (public)
///
/// Reading stats does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Envelope<LinkView>>, AppError> {
    let link = state.link_service.stats(&code).await?;

    Ok(Json(Envelope::ok(link.into())))
}
