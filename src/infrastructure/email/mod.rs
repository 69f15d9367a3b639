//! Outbound email delivery.
//!
//! A backend is selected once at startup from configuration; the rest of
//! the application only sees the [`EmailBackend`] trait.

mod console;
mod transactional;

use std::sync::Arc;

use crate::config::{Config, EmailBackendKind};
use crate::error::AppError;
use async_trait::async_trait;

pub use console::ConsoleEmailBackend;
pub use transactional::TransactionalEmailBackend;

/// A rendered email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery backend for outbound email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailBackend: Send + Sync {
    /// Delivers a single message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provider`] when the upstream provider rejects
    /// the message or cannot be reached.
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Builds the backend named by the configuration.
///
/// Unknown backend kinds are rejected earlier, at config parse time, so
/// this match is total.
pub fn select_backend(config: &Config) -> anyhow::Result<Arc<dyn EmailBackend>> {
    let backend: Arc<dyn EmailBackend> = match config.email_backend {
        EmailBackendKind::Console => Arc::new(ConsoleEmailBackend::new(config.email_sender.clone())),
        EmailBackendKind::Transactional => {
            Arc::new(TransactionalEmailBackend::from_config(config)?)
        }
    };

    tracing::info!(backend = backend.name(), "email backend selected");
    Ok(backend)
}
