//! Development backend that writes messages to the log instead of
//! delivering them.

use async_trait::async_trait;

use super::{EmailBackend, EmailMessage};
use crate::error::AppError;

pub struct ConsoleEmailBackend {
    sender: String,
}

impl ConsoleEmailBackend {
    pub fn new(sender: String) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl EmailBackend for ConsoleEmailBackend {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        tracing::info!(
            from = %self.sender,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "console email"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
