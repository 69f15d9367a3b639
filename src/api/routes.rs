//! REST API route definitions.

use axum::Router;
use axum::routing::{get, post};

use crate::api::handlers::{auth, email_confirmation, password_reset, qrcodes};
use crate::state::AppState;

/// Routes reachable without a session token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route(
            "/password-reset",
            post(password_reset::request_password_reset_handler),
        )
        .route(
            "/password-reset/confirm",
            post(password_reset::confirm_password_reset_handler),
        )
        .route(
            "/confirm-email",
            post(email_confirmation::confirm_email_handler),
        )
        .route(
            "/confirm-email/resend",
            post(email_confirmation::resend_confirmation_handler),
        )
}

/// Routes requiring a bearer session token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/qrcodes",
            post(qrcodes::create_qr_code_handler).get(qrcodes::list_qr_codes_handler),
        )
        .route(
            "/qrcodes/{id}",
            get(qrcodes::get_qr_code_handler)
                .patch(qrcodes::update_qr_code_handler)
                .delete(qrcodes::delete_qr_code_handler),
        )
        .route("/qrcodes/{id}/image", get(qrcodes::qr_code_image_handler))
}
