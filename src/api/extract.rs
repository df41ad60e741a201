//! Request extractors shared by API handlers.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed JSON, a wrong content type and failed validation all become
/// [`AppError::Validation`] so clients always get the standard error body.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::bad_request(
                "Invalid request body",
                json!({ "reason": rejection.body_text() }),
            )
        })?;

        value.validate()?;

        Ok(Self(value))
    }
}
