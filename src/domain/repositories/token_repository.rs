//! Repository trait for time-limited tokens.

use crate::domain::entities::{TimeLimitedToken, TokenType};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for time-limited single-use tokens.
///
/// Tokens are never deleted automatically; consumed or expired tokens stay
/// in storage and are filtered out at validation time.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persists a freshly generated token for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token value already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(
        &self,
        user_id: i64,
        token: &str,
        token_type: TokenType,
    ) -> Result<TimeLimitedToken, AppError>;

    /// Finds a token by its opaque value and type.
    async fn find_by_token(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<TimeLimitedToken>, AppError>;

    /// Marks a token as consumed by setting `used_at = now()`.
    async fn mark_used(&self, id: i64) -> Result<(), AppError>;

    /// Deletes tokens created before `cutoff`. Maintenance-only (admin CLI);
    /// the service itself never deletes tokens.
    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}
