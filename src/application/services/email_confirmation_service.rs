//! Email confirmation flow: confirmation links on signup and resend.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::TokenService;
use crate::domain::entities::{TokenType, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::email::{EmailBackend, EmailMessage};

pub struct EmailConfirmationService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    email: Arc<dyn EmailBackend>,
    base_url: String,
}

impl EmailConfirmationService {
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

    /// Issues a confirmation token for the user and emails the link.
    pub async fn send_confirmation(&self, user: &User) -> Result<(), AppError> {
        let token = self
            .tokens
            .create_for_user(user.id, TokenType::EmailConfirmation)
            .await?;

        let link = format!(
            "{}/confirm-email?token={}",
            self.base_url.trim_end_matches('/'),
            token.token
        );

        self.email
            .send(&EmailMessage {
                to: user.email.clone(),
                subject: "Confirm your email address".to_string(),
                body: format!(
                    "Hello {},\n\nPlease confirm your email address by following this link:\n\n{}",
                    user.name, link
                ),
            })
            .await?;

        tracing::info!(user_id = user.id, "confirmation email sent");
        Ok(())
    }

    /// Re-sends a confirmation email.
    ///
    /// Succeeds silently for unknown addresses, and for already confirmed
    /// accounts no new email goes out.
    pub async fn resend(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("confirmation resend requested for unknown email");
            return Ok(());
        };

        if user.email_confirmed {
            return Ok(());
        }

        self.send_confirmation(&user).await
    }

    /// Consumes a confirmation token and marks the account confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown, expired, or already
    /// consumed token.
    pub async fn confirm(&self, token: &str) -> Result<(), AppError> {
        let record = self
            .tokens
            .validate(token, TokenType::EmailConfirmation)
            .await?
            .ok_or_else(|| {
                AppError::bad_request("Invalid or expired confirmation token", json!({}))
            })?;

        self.users.mark_email_confirmed(record.user_id).await?;
        self.tokens.mark_used(&record).await?;

        tracing::info!(user_id = record.user_id, "email confirmed");
        Ok(())
    }
}
