//! Handler for the public scan redirect endpoint.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a scanned short code to its original URL, counting the scan.
///
/// # Endpoint
///
/// `GET /go/{code}`
///
/// # Behavior
///
/// The scan counter increment and `last_scanned_at` stamp happen in a
/// single atomic update, so concurrent scans never lose counts. The
/// redirect is `302 Found`, keeping targets swappable without clients
/// caching the hop.
///
/// # Errors
///
/// - `404 Not Found` for unknown codes; nothing is recorded
/// - `400 Bad Request` for records that have no redirect target
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let target = state.qr_service.resolve_scan(&code).await?;

    tracing::debug!(code = %code, "scan redirect");

    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
