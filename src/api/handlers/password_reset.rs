//! Handlers for the password reset flow.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::MessageResponse;
use crate::api::dto::password_reset::{ConfirmPasswordResetRequest, RequestPasswordResetRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Starts a password reset.
///
/// # Endpoint
///
/// `POST /api/password-reset`
///
/// Always answers 200 with the same message, whether or not the email is
/// registered.
pub async fn request_password_reset_handler(
    State(state): State<AppState>,
    Json(payload): Json<RequestPasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state.password_reset_service.request_reset(&payload.email).await?;

    Ok(Json(MessageResponse {
        message: "If that email is registered, a reset link has been sent",
    }))
}

/// Completes a password reset with a token from the reset email.
///
/// # Endpoint
///
/// `POST /api/password-reset/confirm`
///
/// # Errors
///
/// Returns 400 Bad Request for invalid, expired, or already used tokens.
pub async fn confirm_password_reset_handler(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmPasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .password_reset_service
        .confirm(&payload.token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated",
    }))
}
