//! Shared application state injected into handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{
    AuthService, EmailConfirmationService, PasswordResetService, QrService, TokenService,
};
use crate::config::Config;
use crate::domain::repositories::{
    QrCodeRepository, SessionRepository, TokenRepository, UserRepository,
};
use crate::infrastructure::email::EmailBackend;

/// Application state shared across all request handlers.
///
/// Cheap to clone; all services sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub base_url: String,
    pub qr_service: Arc<QrService>,
    pub auth_service: Arc<AuthService>,
    pub password_reset_service: Arc<PasswordResetService>,
    pub email_confirmation_service: Arc<EmailConfirmationService>,
}

impl AppState {
    /// Wires up services over the given repositories and email backend.
    pub fn new(
        db: PgPool,
        config: &Config,
        qr_codes: Arc<dyn QrCodeRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        tokens: Arc<dyn TokenRepository>,
        email: Arc<dyn EmailBackend>,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(
            tokens,
            crate::application::services::TokenTtls {
                password_reset_hours: config.password_reset_ttl_hours,
                email_confirmation_hours: config.email_confirmation_ttl_hours,
            },
        ));

        let qr_service = Arc::new(QrService::new(qr_codes, config.base_url.clone()));

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            sessions,
            config.session_signing_secret.clone(),
            config.session_ttl_hours,
        ));

        let password_reset_service = Arc::new(PasswordResetService::new(
            users.clone(),
            token_service.clone(),
            email.clone(),
            config.base_url.clone(),
        ));

        let email_confirmation_service = Arc::new(EmailConfirmationService::new(
            users,
            token_service,
            email,
            config.base_url.clone(),
        ));

        Self {
            db,
            base_url: config.base_url.clone(),
            qr_service,
            auth_service,
            password_reset_service,
            email_confirmation_service,
        }
    }
}
