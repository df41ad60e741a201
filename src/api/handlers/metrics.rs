//! Handler for aggregate usage metrics.

use axum::{Json, extract::State};

use crate::api::dto::links::MetricsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns user, link and click totals, computed on demand.
///
/// # Endpoint
///
/// `GET /api/metrics` (public)
///
/// # Response
///
/// ```json
/// { "totalUsers": 2, "totalUrls": 5, "totalClicks": 17 }
/// ```
pub async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<MetricsResponse>, AppError> {
    let metrics = state.link_service.metrics().await?;

    Ok(Json(metrics.into()))
}
