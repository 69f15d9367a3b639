//! Repository trait for QR record data access.

use crate::domain::entities::{NewQrCode, QrCode, QrCodePatch, ScanHit};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for QR records.
///
/// Short-code uniqueness is enforced by a database unique constraint; the
/// scan counter is incremented by a single atomic update so concurrent scans
/// never lose counts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgQrCodeRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QrCodeRepository: Send + Sync {
    /// Creates a new QR record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_qr: NewQrCode) -> Result<QrCode, AppError>;

    /// Finds a record by id, scoped to its owner. Soft-deleted records are
    /// not returned.
    async fn find_by_id(&self, id: Uuid, user_id: i64) -> Result<Option<QrCode>, AppError>;

    /// Returns whether any record (including soft-deleted ones) holds the
    /// given short code. Used by the collision-retry loop.
    async fn short_code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Lists a user's records, newest first.
    ///
    /// `page` is 1-indexed.
    async fn list(&self, user_id: i64, page: i64, page_size: i64) -> Result<Vec<QrCode>, AppError>;

    /// Counts a user's records (excluding soft-deleted ones).
    async fn count(&self, user_id: i64) -> Result<i64, AppError>;

    /// Partially updates a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches `id` + `user_id`.
    async fn update(
        &self,
        id: Uuid,
        user_id: i64,
        patch: QrCodePatch,
    ) -> Result<QrCode, AppError>;

    /// Soft-deletes a record by setting `deleted_at = now()`.
    ///
    /// Returns `Ok(true)` if the record was found and deleted, `Ok(false)`
    /// if not found or already deleted.
    async fn soft_delete(&self, id: Uuid, user_id: i64) -> Result<bool, AppError>;

    /// Permanently removes a record.
    async fn hard_delete(&self, id: Uuid, user_id: i64) -> Result<bool, AppError>;

    /// Atomically increments the scan counter and stamps `last_scanned_at`
    /// for the record owning `short_code`.
    ///
    /// Returns `Ok(None)` without mutating anything when the code is unknown.
    async fn record_scan(&self, short_code: &str) -> Result<Option<ScanHit>, AppError>;
}
