//! Repository trait for bearer sessions.

use crate::domain::entities::Session;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for session storage.
///
/// Only token hashes are persisted; see
/// [`crate::application::services::AuthService`] for the hashing scheme.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>;

    /// Finds a session by token hash that is neither revoked nor expired.
    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Revokes the session with the given token hash, if any.
    async fn revoke(&self, token_hash: &str) -> Result<(), AppError>;
}
