//! Handlers for account and session endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_auth::AuthBearer;
use validator::Validate;

use crate::api::dto::MessageResponse;
use crate::api::dto::auth::{LoginRequest, LoginResponse, SignupRequest, UserResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account and sends a confirmation email.
///
/// # Endpoint
///
/// `POST /api/auth/signup`
///
/// # Errors
///
/// Returns 409 Conflict for an already registered email.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .signup(&payload.name, &payload.email, &payload.password)
        .await?;

    // Account creation stands even if the confirmation email fails; the
    // user can ask for a resend.
    if let Err(err) = state.email_confirmation_service.send_confirmation(&user).await {
        tracing::warn!(user_id = user.id, error = %err, "confirmation email failed");
    }

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Exchanges credentials for a bearer session token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let (user, session) = state
        .auth_service
        .login(&payload.email, &payload.password, payload.remember)
        .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: UserResponse::from(&user),
    }))
}

/// Revokes the current session.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    AuthBearer(token): AuthBearer,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service.logout(&token).await?;

    Ok(Json(MessageResponse {
        message: "Logged out",
    }))
}

/// Returns the authenticated user's profile.
///
/// # Endpoint
///
/// `GET /api/auth/me`
pub async fn me_handler(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
