//! Transactional email delivery over the provider's HTTP API.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use super::{EmailBackend, EmailMessage};
use crate::config::Config;
use crate::error::AppError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

pub struct TransactionalEmailBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender: String,
}

impl TransactionalEmailBackend {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config
            .email_provider_api_key
            .clone()
            .context("EMAIL_PROVIDER_API_KEY is required for the transactional backend")?;

        let endpoint = config.email_provider_url.clone().unwrap_or_else(|| {
            format!(
                "https://email.{}.transactional-mail.net/v1/messages",
                config.email_provider_region
            )
        });

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            sender: config.email_sender.clone(),
        })
    }
}

#[async_trait]
impl EmailBackend for TransactionalEmailBackend {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SendRequest {
                from: &self.sender,
                to: &message.to,
                subject: &message.subject,
                text: &message.body,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::provider(
                    "Email provider unreachable",
                    json!({ "reason": e.to_string() }),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "email provider rejected message");
            return Err(AppError::provider(
                "Email provider rejected the message",
                json!({ "status": status.as_u16() }),
            ));
        }

        tracing::debug!(to = %message.to, "email accepted by provider");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "transactional"
    }
}
