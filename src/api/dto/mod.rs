//! Request and response DTOs for the HTTP API.

pub mod auth;
pub mod email_confirmation;
pub mod health;
pub mod password_reset;
pub mod qrcode;

use serde::Serialize;

/// Generic message body for endpoints without structured output.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
