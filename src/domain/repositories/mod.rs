//! Repository traits decoupling business logic from storage.

pub mod qr_code_repository;
pub mod session_repository;
pub mod token_repository;
pub mod user_repository;

pub use qr_code_repository::QrCodeRepository;
pub use session_repository::SessionRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use qr_code_repository::MockQrCodeRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
