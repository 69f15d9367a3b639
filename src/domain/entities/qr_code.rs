//! QR record entity with display options and redirect metadata.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Output format of the rendered QR image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrImageFormat {
    #[default]
    Png,
    Svg,
    Jpeg,
}

impl QrImageFormat {
    /// Parses a format name (case-insensitive). Returns `None` on unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Jpeg => "jpeg",
        }
    }

    /// Content type for HTTP responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// QR error correction level, from ~7% (L) to ~30% (H) recoverable damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "L" => Some(Self::L),
            "M" => Some(Self::M),
            "Q" => Some(Self::Q),
            "H" => Some(Self::H),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

/// A stored QR code with content, display options, and scan analytics.
///
/// When `use_url_shortening` is set, `short_code` maps the public redirect
/// endpoint back to `original_url` and `content` encodes the short link
/// instead of the long URL.
#[derive(Debug, Clone)]
pub struct QrCode {
    pub id: Uuid,
    pub user_id: i64,
    pub content: String,
    pub original_url: Option<String>,
    pub use_url_shortening: bool,
    pub short_code: Option<String>,
    pub format: QrImageFormat,
    pub size: i32,
    pub error_correction: ErrorCorrection,
    pub border: i32,
    pub background_color: String,
    pub foreground_color: String,
    pub scan_count: i64,
    pub last_scanned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl QrCode {
    /// Returns true if the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Full public redirect URL for this record, when it has a short code.
    pub fn redirect_url(&self, base_url: &str) -> Option<String> {
        self.short_code
            .as_deref()
            .map(|code| format!("{}/go/{}", base_url.trim_end_matches('/'), code))
    }
}

/// Input data for creating a QR record.
#[derive(Debug, Clone)]
pub struct NewQrCode {
    pub user_id: i64,
    pub content: String,
    pub original_url: Option<String>,
    pub use_url_shortening: bool,
    /// Set by the service when shortening is requested; never caller-provided.
    pub short_code: Option<String>,
    pub format: QrImageFormat,
    pub size: i32,
    pub error_correction: ErrorCorrection,
    pub border: i32,
    pub background_color: String,
    pub foreground_color: String,
}

/// Partial update for an existing QR record.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct QrCodePatch {
    pub content: Option<String>,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    /// When `true`, clears `deleted_at` to restore a soft-deleted record.
    pub restore: bool,
}

/// Result of an atomic scan recording against a short code.
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub original_url: Option<String>,
    pub scan_count: i64,
}
