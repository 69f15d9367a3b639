//! HTTP request handlers.

pub mod auth;
pub mod email_confirmation;
pub mod health;
pub mod password_reset;
pub mod qrcodes;
pub mod redirect;

pub use health::health_handler;
pub use redirect::redirect_handler;
