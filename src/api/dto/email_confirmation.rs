//! DTOs for the email confirmation flow.

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmEmailRequest {
    #[validate(length(equal = 48))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResendConfirmationRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}
