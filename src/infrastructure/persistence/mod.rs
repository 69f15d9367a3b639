//! PostgreSQL-backed repository implementations.

mod pg_qr_code_repository;
mod pg_session_repository;
mod pg_token_repository;
mod pg_user_repository;

pub use pg_qr_code_repository::PgQrCodeRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
