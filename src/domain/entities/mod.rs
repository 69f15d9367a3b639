//! Core business entities.

pub mod qr_code;
pub mod session;
pub mod token;
pub mod user;

pub use qr_code::{ErrorCorrection, NewQrCode, QrCode, QrCodePatch, QrImageFormat, ScanHit};
pub use session::Session;
pub use token::{TimeLimitedToken, TokenType};
pub use user::{NewUser, User};
