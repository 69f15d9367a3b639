//! Handlers for the email confirmation flow.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::MessageResponse;
use crate::api::dto::email_confirmation::{ConfirmEmailRequest, ResendConfirmationRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Confirms an email address with a token from the confirmation email.
///
/// # Endpoint
///
/// `POST /api/confirm-email`
///
/// # Errors
///
/// Returns 400 Bad Request for invalid, expired, or already used tokens.
pub async fn confirm_email_handler(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state.email_confirmation_service.confirm(&payload.token).await?;

    Ok(Json(MessageResponse {
        message: "Email confirmed",
    }))
}

/// Re-sends the confirmation email for an unconfirmed account.
///
/// # Endpoint
///
/// `POST /api/confirm-email/resend`
///
/// Always answers 200 with the same message, whether or not the email is
/// registered.
pub async fn resend_confirmation_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResendConfirmationRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state.email_confirmation_service.resend(&payload.email).await?;

    Ok(Json(MessageResponse {
        message: "If that email is registered, a confirmation link has been sent",
    }))
}
