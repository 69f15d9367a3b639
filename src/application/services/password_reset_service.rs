//! Password reset flow: token issuance by email and reset confirmation.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::auth_service::{hash_password, validate_password};
use crate::application::services::TokenService;
use crate::domain::entities::TokenType;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::email::{EmailBackend, EmailMessage};

pub struct PasswordResetService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    email: Arc<dyn EmailBackend>,
    base_url: String,
}

impl PasswordResetService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        email: Arc<dyn EmailBackend>,
        base_url: String,
    ) -> Self {
        Self {
            users,
            tokens,
            email,
            base_url,
        }
    }

    /// Starts a reset for the given email address.
    ///
    /// Succeeds silently when the address is unknown, so the endpoint does
    /// not reveal which emails are registered.
    pub async fn request_reset(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let token = self
            .tokens
            .create_for_user(user.id, TokenType::PasswordReset)
            .await?;

        let link = format!(
            "{}/password-reset/confirm?token={}",
            self.base_url.trim_end_matches('/'),
            token.token
        );

        self.email
            .send(&EmailMessage {
                to: user.email.clone(),
                subject: "Reset your password".to_string(),
                body: format!(
                    "Hello {},\n\nUse the link below to reset your password:\n\n{}\n\n\
                     If you did not request this, you can ignore this email.",
                    user.name, link
                ),
            })
            .await?;

        tracing::info!(user_id = user.id, "password reset email sent");
        Ok(())
    }

    /// Completes a reset: consumes the token and stores the new password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown, expired, or already
    /// consumed token, and for a too-short password. The password is checked
    /// before the token gets consumed, so a rejected password leaves the
    /// token usable.
    pub async fn confirm(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        validate_password(new_password)?;

        let record = self
            .tokens
            .validate(token, TokenType::PasswordReset)
            .await?
            .ok_or_else(|| {
                AppError::bad_request("Invalid or expired password reset token", json!({}))
            })?;

        let password_hash = hash_password(new_password)?;
        self.users
            .update_password(record.user_id, &password_hash)
            .await?;
        self.tokens.mark_used(&record).await?;

        tracing::info!(user_id = record.user_id, "password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::token_service::TokenTtls;
    use crate::domain::entities::{TimeLimitedToken, User};
    use crate::domain::repositories::{MockTokenRepository, MockUserRepository};
    use crate::infrastructure::email::MockEmailBackend;
    use chrono::Utc;

    const BASE_URL: &str = "http://localhost:3000";

    const TTLS: TokenTtls = TokenTtls {
        password_reset_hours: 4,
        email_confirmation_hours: 48,
    };

    fn stored_user() -> User {
        User {
            id: 7,
            name: "Test User".to_string(),
            email: "user@example.com".to_string(),
            password_hash: "$argon2id$old".to_string(),
            email_confirmed: true,
            email_confirmed_at: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    fn service(
        users: MockUserRepository,
        tokens: MockTokenRepository,
        email: MockEmailBackend,
    ) -> PasswordResetService {
        PasswordResetService::new(
            Arc::new(users),
            Arc::new(TokenService::new(Arc::new(tokens), TTLS)),
            Arc::new(email),
            BASE_URL.to_string(),
        )
    }

    #[tokio::test]
    async fn test_request_reset_sends_email_with_token_link() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user())));

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_create()
            .times(1)
            .returning(|user_id, token, token_type| {
                Ok(TimeLimitedToken {
                    id: 1,
                    user_id,
                    token: token.to_string(),
                    token_type,
                    created_at: Utc::now(),
                    used_at: None,
                })
            });

        let mut email = MockEmailBackend::new();
        email
            .expect_send()
            .withf(|message| {
                message.to == "user@example.com"
                    && message
                        .body
                        .contains("http://localhost:3000/password-reset/confirm?token=")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(users, tokens, email);

        service.request_reset("user@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_request_reset_is_silent_for_unknown_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let mut email = MockEmailBackend::new();
        email.expect_send().times(0);

        let service = service(users, MockTokenRepository::new(), email);

        assert!(service.request_reset("nobody@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_confirm_updates_password_and_consumes_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_update_password()
            .withf(|user_id, hash| *user_id == 7 && hash.starts_with("$argon2"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut tokens = MockTokenRepository::new();
        tokens.expect_find_by_token().times(1).returning(|token, token_type| {
            Ok(Some(TimeLimitedToken {
                id: 1,
                user_id: 7,
                token: token.to_string(),
                token_type,
                created_at: Utc::now(),
                used_at: None,
            }))
        });
        tokens
            .expect_mark_used()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(users, tokens, MockEmailBackend::new());

        service
            .confirm("sometoken", "new-password-123")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_confirm_rejects_invalid_token() {
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_by_token()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = service(MockUserRepository::new(), tokens, MockEmailBackend::new());

        let result = service.confirm("bogus", "new-password-123").await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_confirm_rejects_short_password_before_consuming_token() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_find_by_token().times(0);
        tokens.expect_mark_used().times(0);

        let service = service(MockUserRepository::new(), tokens, MockEmailBackend::new());

        let result = service.confirm("sometoken", "short").await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }
}
