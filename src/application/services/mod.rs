//! Business logic, free of HTTP and persistence concerns.

pub mod auth_service;
pub mod email_confirmation_service;
pub mod password_reset_service;
pub mod qr_service;
pub mod token_service;

pub use auth_service::{AuthService, IssuedSession};
pub use email_confirmation_service::EmailConfirmationService;
pub use password_reset_service::PasswordResetService;
pub use qr_service::{CreateQrCode, QrService};
pub use token_service::{TokenService, TokenTtls};
