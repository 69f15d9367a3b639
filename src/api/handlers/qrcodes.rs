//! Handlers for QR record CRUD and image rendering.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::qrcode::{
    CreateQrCodeRequest, DeleteQuery, ImageQuery, ListQuery, QrCodeListResponse, QrCodeResponse,
    UpdateQrCodeRequest,
};
use crate::api::middleware::auth::CurrentUser;
use crate::application::services::CreateQrCode;
use crate::domain::entities::{ErrorCorrection, QrCodePatch, QrImageFormat};
use crate::error::AppError;
use crate::infrastructure::qr_render::{self, RenderOptions};
use crate::state::AppState;
use crate::utils::color;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Creates a QR record.
///
/// # Endpoint
///
/// `POST /api/qrcodes`
///
/// # Errors
///
/// Returns 400 Bad Request on validation failures and 500 if short-code
/// generation keeps colliding.
pub async fn create_qr_code_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateQrCodeRequest>,
) -> Result<(StatusCode, Json<QrCodeResponse>), AppError> {
    payload.validate()?;

    let qr = state
        .qr_service
        .create_qr_code(CreateQrCode {
            user_id: user.id,
            url: payload.url,
            data: payload.data,
            use_url_shortening: payload.use_url_shortening,
            format: payload
                .format
                .as_deref()
                .and_then(QrImageFormat::parse)
                .unwrap_or_default(),
            size: payload.size.unwrap_or(10),
            error_correction: payload
                .error_correction
                .as_deref()
                .and_then(ErrorCorrection::parse)
                .unwrap_or_default(),
            border: payload.border.unwrap_or(4),
            background_color: payload.background_color.unwrap_or_else(|| "white".to_string()),
            foreground_color: payload.foreground_color.unwrap_or_else(|| "black".to_string()),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(QrCodeResponse::from_entity(&qr, &state.base_url)),
    ))
}

/// Lists the caller's QR records, newest first.
///
/// # Endpoint
///
/// `GET /api/qrcodes?page=1&page_size=20`
pub async fn list_qr_codes_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<QrCodeListResponse>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let (items, total) = state.qr_service.list_qr_codes(user.id, page, page_size).await?;

    Ok(Json(QrCodeListResponse {
        items: items
            .iter()
            .map(|qr| QrCodeResponse::from_entity(qr, &state.base_url))
            .collect(),
        page,
        page_size,
        total,
    }))
}

/// Fetches a single QR record.
///
/// # Endpoint
///
/// `GET /api/qrcodes/{id}`
pub async fn get_qr_code_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<QrCodeResponse>, AppError> {
    let qr = state.qr_service.get_qr_code(id, user.id).await?;
    Ok(Json(QrCodeResponse::from_entity(&qr, &state.base_url)))
}

/// Partially updates a QR record.
///
/// # Endpoint
///
/// `PATCH /api/qrcodes/{id}`
pub async fn update_qr_code_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQrCodeRequest>,
) -> Result<Json<QrCodeResponse>, AppError> {
    payload.validate()?;

    let qr = state
        .qr_service
        .update_qr_code(
            id,
            user.id,
            QrCodePatch {
                content: payload.content,
                background_color: payload.background_color,
                foreground_color: payload.foreground_color,
                restore: payload.restore,
            },
        )
        .await?;

    Ok(Json(QrCodeResponse::from_entity(&qr, &state.base_url)))
}

/// Deletes a QR record. Soft by default; `?permanent=true` removes it
/// for good.
///
/// # Endpoint
///
/// `DELETE /api/qrcodes/{id}`
pub async fn delete_qr_code_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, AppError> {
    state
        .qr_service
        .delete_qr_code(id, user.id, query.permanent)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Renders a QR record as an image using its stored display options.
///
/// # Endpoint
///
/// `GET /api/qrcodes/{id}/image?format=svg`
///
/// The optional `format` query parameter overrides the stored output
/// format for this request only.
pub async fn qr_code_image_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, AppError> {
    query.validate()?;

    let qr = state.qr_service.get_qr_code(id, user.id).await?;

    let format = query
        .format
        .as_deref()
        .and_then(QrImageFormat::parse)
        .unwrap_or(qr.format);

    let options = RenderOptions {
        format,
        scale: qr.size.max(1) as u32,
        error_correction: qr.error_correction,
        border: qr.border.max(0) as u32,
        background: parse_stored_color(&qr.background_color)?,
        foreground: parse_stored_color(&qr.foreground_color)?,
    };

    let bytes = qr_render::render(&qr.content, &options)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, format.content_type())],
        bytes,
    )
        .into_response())
}

/// Stored colors were validated on write, so a parse failure here means
/// the row was edited out of band.
fn parse_stored_color(value: &str) -> Result<color::Rgba, AppError> {
    color::parse_color(value).map_err(|e| {
        AppError::internal(
            "Stored color is invalid",
            json!({ "reason": e.to_string() }),
        )
    })
}
