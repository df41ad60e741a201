//! Restores internal error details in development responses.

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{ErrorBody, ErrorInfo, InternalErrorDetail};

/// Rewrites internal error bodies with their real message and details when
/// `expose` is true.
///
/// [`crate::error::AppError`] always answers internal errors with a generic body and attaches
/// the original as an [`InternalErrorDetail`] extension. In production the
/// extension is dropped here; in development it replaces the body.
///
/// # Example
///
/// ```rust,ignore
/// let app = router.layer(middleware::from_fn_with_state(
///     config.is_development(),
///     error_detail::layer,
/// ));
/// ```
pub async fn layer(State(expose): State<bool>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let Some(detail) = response.extensions_mut().remove::<InternalErrorDetail>() else {
        return response;
    };

    if !expose {
        return response;
    }

    let error = ErrorInfo {
        code: "internal_error",
        message: detail.message,
        details: detail.details,
    };

    (response.status(), Json(ErrorBody { error })).into_response()
}
