//! QR record creation, retrieval, and scan resolution.

use std::sync::Arc;

use crate::domain::entities::{
    ErrorCorrection, NewQrCode, QrCode, QrCodePatch, QrImageFormat, ScanHit,
};
use crate::domain::repositories::QrCodeRepository;
use crate::error::AppError;
use crate::utils::short_code::{DEFAULT_SHORT_CODE_LENGTH, generate_short_code};
use serde_json::json;
use url::Url;

/// Maximum accepted length for original URLs.
const MAX_URL_LENGTH: usize = 2000;

/// Validated input for creating a QR record.
///
/// Exactly one of `url` / `data` must be set; the service enforces this so
/// all entry points (HTTP, CLI) share the rule.
#[derive(Debug, Clone)]
pub struct CreateQrCode {
    pub user_id: i64,
    pub url: Option<String>,
    pub data: Option<String>,
    pub use_url_shortening: bool,
    pub format: QrImageFormat,
    pub size: i32,
    pub error_correction: ErrorCorrection,
    pub border: i32,
    pub background_color: String,
    pub foreground_color: String,
}

/// Service for managing QR records.
///
/// Handles content resolution, short-code issuance with bounded collision
/// retry, and the public scan/redirect path.
pub struct QrService {
    repository: Arc<dyn QrCodeRepository>,
    base_url: String,
}

impl QrService {
    /// Collision retry bound for short-code generation. At 62^8 codes the
    /// loop effectively never exhausts; the bound exists so a pathological
    /// store cannot wedge a request forever.
    const MAX_ATTEMPTS: usize = 10;

    pub fn new(repository: Arc<dyn QrCodeRepository>, base_url: String) -> Self {
        Self {
            repository,
            base_url,
        }
    }

    /// Creates a QR record, issuing a unique short code when shortening is
    /// requested and pointing the encoded content at the redirect endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - neither or both of `url` / `data` are provided
    /// - the URL is malformed, non-HTTP(S), or too long
    /// - shortening is requested without a URL
    pub async fn create_qr_code(&self, input: CreateQrCode) -> Result<QrCode, AppError> {
        let (content_source, original_url) = match (input.url, input.data) {
            (Some(url), None) => {
                let normalized = validate_url(&url)?;
                (normalized.clone(), Some(normalized))
            }
            (None, Some(data)) => {
                if data.is_empty() {
                    return Err(AppError::bad_request("'data' must not be empty", json!({})));
                }
                (data, None)
            }
            (Some(_), Some(_)) => {
                return Err(AppError::bad_request(
                    "Provide either 'url' or 'data', not both",
                    json!({}),
                ));
            }
            (None, None) => {
                return Err(AppError::bad_request(
                    "Either 'url' or 'data' must be provided",
                    json!({}),
                ));
            }
        };

        if input.use_url_shortening && original_url.is_none() {
            return Err(AppError::bad_request(
                "URL shortening requires 'url'",
                json!({}),
            ));
        }

        if !input.use_url_shortening {
            return self
                .repository
                .create(NewQrCode {
                    user_id: input.user_id,
                    content: content_source,
                    original_url,
                    use_url_shortening: false,
                    short_code: None,
                    format: input.format,
                    size: input.size,
                    error_correction: input.error_correction,
                    border: input.border,
                    background_color: input.background_color,
                    foreground_color: input.foreground_color,
                })
                .await;
        }

        // The existence check and the INSERT are separate statements, so a
        // concurrent request can still win the race on the unique
        // constraint. That surfaces as Conflict here and gets the same
        // bounded retry as a generation-time collision.
        for _ in 0..Self::MAX_ATTEMPTS {
            let code = self.generate_unique_short_code().await?;

            // With shortening enabled the QR encodes the short redirect
            // link, not the original URL.
            let content = format!("{}/go/{}", self.base_url.trim_end_matches('/'), code);

            match self
                .repository
                .create(NewQrCode {
                    user_id: input.user_id,
                    content,
                    original_url: original_url.clone(),
                    use_url_shortening: true,
                    short_code: Some(code),
                    format: input.format,
                    size: input.size,
                    error_correction: input.error_correction,
                    border: input.border,
                    background_color: input.background_color.clone(),
                    foreground_color: input.foreground_color.clone(),
                })
                .await
            {
                Err(AppError::Conflict { .. }) => continue,
                result => return result,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique short code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Retrieves a record by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches.
    pub async fn get_qr_code(&self, id: uuid::Uuid, user_id: i64) -> Result<QrCode, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("QR code not found", json!({ "id": id })))
    }

    /// Lists a user's records with the total count for pagination.
    pub async fn list_qr_codes(
        &self,
        user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<QrCode>, i64), AppError> {
        let items = self.repository.list(user_id, page, page_size).await?;
        let total = self.repository.count(user_id).await?;
        Ok((items, total))
    }

    /// Partially updates a record.
    pub async fn update_qr_code(
        &self,
        id: uuid::Uuid,
        user_id: i64,
        patch: QrCodePatch,
    ) -> Result<QrCode, AppError> {
        self.repository.update(id, user_id, patch).await
    }

    /// Deletes a record; soft by default, permanent on request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches.
    pub async fn delete_qr_code(
        &self,
        id: uuid::Uuid,
        user_id: i64,
        permanent: bool,
    ) -> Result<(), AppError> {
        let deleted = if permanent {
            self.repository.hard_delete(id, user_id).await?
        } else {
            self.repository.soft_delete(id, user_id).await?
        };

        if deleted {
            Ok(())
        } else {
            Err(AppError::not_found("QR code not found", json!({ "id": id })))
        }
    }

    /// Resolves a public scan: records it atomically and returns the
    /// redirect target.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown short codes (no state is
    /// mutated) and [`AppError::Validation`] for records without a redirect
    /// target.
    pub async fn resolve_scan(&self, short_code: &str) -> Result<String, AppError> {
        match self.repository.record_scan(short_code).await? {
            None => Err(AppError::not_found(
                "QR code not found",
                json!({ "short_code": short_code }),
            )),
            Some(ScanHit {
                original_url: Some(url),
                ..
            }) => Ok(url),
            Some(ScanHit {
                original_url: None, ..
            }) => Err(AppError::bad_request(
                "No redirect URL available for this QR code",
                json!({ "short_code": short_code }),
            )),
        }
    }

    /// Generates a short code no existing record holds, with bounded retry.
    async fn generate_unique_short_code(&self) -> Result<String, AppError> {
        for _ in 0..Self::MAX_ATTEMPTS {
            let code = generate_short_code(DEFAULT_SHORT_CODE_LENGTH);

            if !self.repository.short_code_exists(&code).await? {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique short code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

/// Validates and lightly normalizes an original URL.
fn validate_url(raw: &str) -> Result<String, AppError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(AppError::bad_request(
            "URL is too long",
            json!({ "max_length": MAX_URL_LENGTH, "provided_length": raw.len() }),
        ));
    }

    let parsed = Url::parse(raw)
        .map_err(|e| AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() })))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::bad_request(
            "URL must use http or https",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    Ok(parsed.to_string())
}
