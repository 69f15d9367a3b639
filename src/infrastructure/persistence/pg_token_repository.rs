//! PostgreSQL implementation of [`TokenRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{TimeLimitedToken, TokenType};
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

const TOKEN_COLUMNS: &str = "id, user_id, token, token_type, created_at, used_at";

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: i64,
    user_id: i64,
    token: String,
    token_type: String,
    created_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

impl TokenRow {
    fn into_entity(self) -> Result<TimeLimitedToken, AppError> {
        let token_type = TokenType::parse(&self.token_type).ok_or_else(|| {
            AppError::internal(
                "Unknown token type in storage",
                serde_json::json!({ "token_type": self.token_type }),
            )
        })?;

        Ok(TimeLimitedToken {
            id: self.id,
            user_id: self.user_id,
            token: self.token,
            token_type,
            created_at: self.created_at,
            used_at: self.used_at,
        })
    }
}

pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn create(
        &self,
        user_id: i64,
        token: &str,
        token_type: TokenType,
    ) -> Result<TimeLimitedToken, AppError> {
        let sql = format!(
            "INSERT INTO time_limited_tokens (user_id, token, token_type) \
             VALUES ($1, $2, $3) \
             RETURNING {TOKEN_COLUMNS}"
        );

        let row = sqlx::query_as::<_, TokenRow>(&sql)
            .bind(user_id)
            .bind(token)
            .bind(token_type.as_str())
            .fetch_one(&self.pool)
            .await?;

        row.into_entity()
    }

    async fn find_by_token(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<TimeLimitedToken>, AppError> {
        let sql = format!(
            "SELECT {TOKEN_COLUMNS} FROM time_limited_tokens \
             WHERE token = $1 AND token_type = $2"
        );

        let row = sqlx::query_as::<_, TokenRow>(&sql)
            .bind(token)
            .bind(token_type.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TokenRow::into_entity).transpose()
    }

    async fn mark_used(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE time_limited_tokens SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM time_limited_tokens WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
