//! Handlers for registration, login and the caller's profile.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, ProfileUpdatedResponse,
    RegisterRequest, UpdateProfileRequest, UserView,
};
use crate::api::extract::ValidatedJson;
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new user.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Request Body
///
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// Returns 400 if a field is missing or the email is malformed, 409 if the
/// email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state
        .account_service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered")),
    ))
}

/// Exchanges credentials for a session token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Response
///
/// ```json
/// { "token": "eyJ...", "user": { "id": 1, "name": "Ada", "email": "ada@example.com" } }
/// ```
///
/// # Errors
///
/// Returns 400 if a field is missing and 401 "Invalid credentials" for an
/// unknown email or a wrong password alike.
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (token, user) = state
        .account_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// `GET /api/auth/me` (session token only)
pub async fn profile_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserView>, AppError> {
    let profile = state.account_service.profile(user.user_id).await?;

    Ok(Json(profile.into()))
}

/// Updates the caller's name and/or email.
///
/// # Endpoint
///
/// `PUT /api/auth/me` (session token only)
///
/// # Errors
///
/// Returns 400 if neither field is provided, 409 if the email is taken.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileUpdatedResponse>, AppError> {
    let updated = state
        .account_service
        .update_profile(
            user.user_id,
            payload.name.as_deref(),
            payload.email.as_deref(),
        )
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated".to_string(),
        user: updated.into(),
    }))
}

/// Changes the caller's password.
///
/// # Endpoint
///
/// `PUT /api/auth/me/password` (session token only)
///
/// # Errors
///
/// Returns 400 if a field is missing and 403 if the current password is wrong.
pub async fn change_password_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .account_service
        .change_password(user.user_id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated")))
}
