//! PostgreSQL implementation of [`SessionRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::Session;
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

const SESSION_COLUMNS: &str = "id, user_id, token_hash, created_at, expires_at, revoked_at";

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let sql = format!(
            "INSERT INTO sessions (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {SESSION_COLUMNS}"
        );

        let session = sqlx::query_as::<_, Session>(&sql)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(session)
    }

    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions \
             WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > NOW()"
        );

        let session = sqlx::query_as::<_, Session>(&sql)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() \
             WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
