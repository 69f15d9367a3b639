//! DTOs for QR record endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::entities::{ErrorCorrection, QrCode, QrImageFormat};
use crate::utils::color;

/// Request to create a QR record.
///
/// Exactly one of `url` / `data` must be set; the service layer enforces
/// this so the rule also covers non-HTTP entry points.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQrCodeRequest {
    /// Target URL. Required when `use_url_shortening` is set.
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,

    /// Arbitrary payload to encode instead of a URL.
    #[validate(length(min = 1, max = 2000))]
    pub data: Option<String>,

    #[serde(default)]
    pub use_url_shortening: bool,

    /// Output format: `png` (default), `svg`, or `jpeg`.
    #[validate(custom(function = "validate_format"))]
    pub format: Option<String>,

    /// Pixels per module (default: 10).
    #[validate(range(min = 1, max = 50))]
    pub size: Option<i32>,

    /// Error correction level: `L`, `M` (default), `Q`, or `H`.
    #[validate(custom(function = "validate_error_correction"))]
    pub error_correction: Option<String>,

    /// Quiet zone width in modules (default: 4).
    #[validate(range(min = 0, max = 20))]
    pub border: Option<i32>,

    /// Named color, `#rgb`/`#rrggbb` hex, or `transparent` (default: white).
    #[validate(custom(function = "validate_color"))]
    pub background_color: Option<String>,

    /// Named color or hex (default: black).
    #[validate(custom(function = "validate_color"))]
    pub foreground_color: Option<String>,
}

/// Partial update for a QR record.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQrCodeRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: Option<String>,

    #[validate(custom(function = "validate_color"))]
    pub background_color: Option<String>,

    #[validate(custom(function = "validate_color"))]
    pub foreground_color: Option<String>,

    /// When `true`, restores a soft-deleted record.
    #[serde(default)]
    pub restore: bool,
}

/// Pagination query for the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query flags for the delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// When `true`, removes the record permanently instead of soft-deleting.
    #[serde(default)]
    pub permanent: bool,
}

/// Query overrides for the image endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct ImageQuery {
    /// Overrides the stored output format for this request.
    #[validate(custom(function = "validate_format"))]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    pub id: Uuid,
    pub content: String,
    pub original_url: Option<String>,
    pub use_url_shortening: bool,
    pub short_code: Option<String>,
    /// Full public redirect URL, when the record has a short code.
    pub redirect_url: Option<String>,
    pub format: &'static str,
    pub size: i32,
    pub error_correction: &'static str,
    pub border: i32,
    pub background_color: String,
    pub foreground_color: String,
    pub scan_count: i64,
    pub last_scanned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QrCodeResponse {
    pub fn from_entity(qr: &QrCode, base_url: &str) -> Self {
        Self {
            id: qr.id,
            content: qr.content.clone(),
            original_url: qr.original_url.clone(),
            use_url_shortening: qr.use_url_shortening,
            short_code: qr.short_code.clone(),
            redirect_url: qr.redirect_url(base_url),
            format: qr.format.as_str(),
            size: qr.size,
            error_correction: qr.error_correction.as_str(),
            border: qr.border,
            background_color: qr.background_color.clone(),
            foreground_color: qr.foreground_color.clone(),
            scan_count: qr.scan_count,
            last_scanned_at: qr.last_scanned_at,
            created_at: qr.created_at,
            updated_at: qr.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QrCodeListResponse {
    pub items: Vec<QrCodeResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

fn validate_format(value: &str) -> Result<(), ValidationError> {
    if QrImageFormat::parse(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("format").with_message("must be one of: png, svg, jpeg".into()))
    }
}

fn validate_error_correction(value: &str) -> Result<(), ValidationError> {
    if ErrorCorrection::parse(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("error_correction")
            .with_message("must be one of: L, M, Q, H".into()))
    }
}

fn validate_color(value: &str) -> Result<(), ValidationError> {
    if color::is_valid_color(value) {
        Ok(())
    } else {
        Err(ValidationError::new("color")
            .with_message("must be a named color, hex value, or 'transparent'".into()))
    }
}
