//! Time-limited single-use tokens backing password reset and email
//! confirmation.

use std::sync::Arc;

use crate::domain::entities::{TimeLimitedToken, TokenType};
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use crate::utils::short_code::generate_opaque_token;
use chrono::Duration;

/// Per-type token lifetimes, in hours.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtls {
    pub password_reset_hours: i64,
    pub email_confirmation_hours: i64,
}

impl TokenTtls {
    fn for_type(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::PasswordReset => Duration::hours(self.password_reset_hours),
            TokenType::EmailConfirmation => Duration::hours(self.email_confirmation_hours),
        }
    }
}

/// Service for issuing and validating time-limited single-use tokens.
pub struct TokenService {
    repository: Arc<dyn TokenRepository>,
    ttls: TokenTtls,
}

impl TokenService {
    pub fn new(repository: Arc<dyn TokenRepository>, ttls: TokenTtls) -> Self {
        Self { repository, ttls }
    }

    /// Issues a fresh token for a user. Previously issued tokens of the same
    /// type stay valid until they expire or get consumed.
    pub async fn create_for_user(
        &self,
        user_id: i64,
        token_type: TokenType,
    ) -> Result<TimeLimitedToken, AppError> {
        let token = generate_opaque_token();
        self.repository.create(user_id, &token, token_type).await
    }

    /// Validates a token of the given type.
    ///
    /// Returns `None` uniformly for unknown, consumed, and expired tokens so
    /// callers cannot distinguish the cases.
    pub async fn validate(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<TimeLimitedToken>, AppError> {
        let Some(record) = self.repository.find_by_token(token, token_type).await? else {
            return Ok(None);
        };

        if record.is_used() || record.is_expired(self.ttls.for_type(token_type)) {
            return Ok(None);
        }

        Ok(Some(record))
    }

    /// Consumes a token. Marking an already consumed token is a no-op.
    pub async fn mark_used(&self, token: &TimeLimitedToken) -> Result<(), AppError> {
        self.repository.mark_used(token.id).await
    }
}
