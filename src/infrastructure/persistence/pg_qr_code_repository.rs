//! PostgreSQL implementation of [`QrCodeRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{
    ErrorCorrection, NewQrCode, QrCode, QrCodePatch, QrImageFormat, ScanHit,
};
use crate::domain::repositories::QrCodeRepository;
use crate::error::AppError;

const QR_COLUMNS: &str = "id, user_id, content, original_url, use_url_shortening, short_code, \
     qr_format, size, error_correction, border, background_color, foreground_color, \
     scan_count, last_scanned_at, created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct QrCodeRow {
    id: Uuid,
    user_id: i64,
    content: String,
    original_url: Option<String>,
    use_url_shortening: bool,
    short_code: Option<String>,
    qr_format: String,
    size: i32,
    error_correction: String,
    border: i32,
    background_color: String,
    foreground_color: String,
    scan_count: i64,
    last_scanned_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<QrCodeRow> for QrCode {
    fn from(row: QrCodeRow) -> Self {
        QrCode {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            original_url: row.original_url,
            use_url_shortening: row.use_url_shortening,
            short_code: row.short_code,
            // Columns are only ever written from the parsed enums, so an
            // unknown value can only come from manual edits.
            format: QrImageFormat::parse(&row.qr_format).unwrap_or_default(),
            size: row.size,
            error_correction: ErrorCorrection::parse(&row.error_correction).unwrap_or_default(),
            border: row.border,
            background_color: row.background_color,
            foreground_color: row.foreground_color,
            scan_count: row.scan_count,
            last_scanned_at: row.last_scanned_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

pub struct PgQrCodeRepository {
    pool: PgPool,
}

impl PgQrCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QrCodeRepository for PgQrCodeRepository {
    async fn create(&self, new_qr: NewQrCode) -> Result<QrCode, AppError> {
        let sql = format!(
            "INSERT INTO qr_codes (id, user_id, content, original_url, use_url_shortening, \
             short_code, qr_format, size, error_correction, border, background_color, \
             foreground_color) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {QR_COLUMNS}"
        );

        let row = sqlx::query_as::<_, QrCodeRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_qr.user_id)
            .bind(&new_qr.content)
            .bind(&new_qr.original_url)
            .bind(new_qr.use_url_shortening)
            .bind(&new_qr.short_code)
            .bind(new_qr.format.as_str())
            .bind(new_qr.size)
            .bind(new_qr.error_correction.as_str())
            .bind(new_qr.border)
            .bind(&new_qr.background_color)
            .bind(&new_qr.foreground_color)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid, user_id: i64) -> Result<Option<QrCode>, AppError> {
        let sql = format!(
            "SELECT {QR_COLUMNS} FROM qr_codes \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        );

        let row = sqlx::query_as::<_, QrCodeRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn short_code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM qr_codes WHERE short_code = $1)")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn list(&self, user_id: i64, page: i64, page_size: i64) -> Result<Vec<QrCode>, AppError> {
        let sql = format!(
            "SELECT {QR_COLUMNS} FROM qr_codes \
             WHERE user_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, QrCodeRow>(&sql)
            .bind(user_id)
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, user_id: i64) -> Result<i64, AppError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM qr_codes WHERE user_id = $1 AND deleted_at IS NULL")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: i64,
        patch: QrCodePatch,
    ) -> Result<QrCode, AppError> {
        let sql = format!(
            "UPDATE qr_codes SET \
                 content = COALESCE($3, content), \
                 background_color = COALESCE($4, background_color), \
                 foreground_color = COALESCE($5, foreground_color), \
                 deleted_at = CASE WHEN $6 THEN NULL ELSE deleted_at END, \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND (deleted_at IS NULL OR $6) \
             RETURNING {QR_COLUMNS}"
        );

        let row = sqlx::query_as::<_, QrCodeRow>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&patch.content)
            .bind(&patch.background_color)
            .bind(&patch.foreground_color)
            .bind(patch.restore)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Into::into).ok_or_else(|| {
            AppError::not_found("QR code not found", serde_json::json!({ "id": id }))
        })
    }

    async fn soft_delete(&self, id: Uuid, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE qr_codes SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn hard_delete(&self, id: Uuid, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_scan(&self, short_code: &str) -> Result<Option<ScanHit>, AppError> {
        // Single atomic update: concurrent scans each get their own
        // incremented count and none are lost.
        let row: Option<(Option<String>, i64)> = sqlx::query_as(
            "UPDATE qr_codes \
             SET scan_count = scan_count + 1, last_scanned_at = NOW() \
             WHERE short_code = $1 AND deleted_at IS NULL \
             RETURNING original_url, scan_count",
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(original_url, scan_count)| ScanHit {
            original_url,
            scan_count,
        }))
    }
}
