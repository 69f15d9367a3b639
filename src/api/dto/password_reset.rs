//! DTOs for the password reset flow.

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RequestPasswordResetRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmPasswordResetRequest {
    #[validate(length(equal = 48))]
    pub token: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}
