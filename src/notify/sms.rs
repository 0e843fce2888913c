use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{require, SmsSettings};
use crate::notify::NotificationChannel;
use crate::utils::error::{AppError, Result};

/// SMS delivery via an AfricasTalking-style messaging endpoint: one
/// form-encoded POST of `{username, to, message}` with an `apikey` header.
pub struct SmsChannel {
    client: reqwest::Client,
    settings: SmsSettings,
}

impl SmsChannel {
    pub fn new(settings: SmsSettings, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn name(&self) -> &str {
        "sms"
    }

    async fn send(&self, message: &str) -> Result<()> {
        // Credentials are required only here, at first use.
        let api_key = require(&self.settings.api_key, "API_KEY")?;
        let username = require(&self.settings.username, "USERNAME")?;
        let recipient = require(&self.settings.recipient, "RECIPIENT_NUMBER")?;

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header("apikey", api_key)
            .header("Accept", "application/json")
            .form(&[("username", username), ("to", recipient), ("message", message)])
            .send()
            .await
            .map_err(|e| AppError::Delivery(format!("sms request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(%status, %body, "sms gateway response");

        if !status.is_success() {
            return Err(AppError::Delivery(format!(
                "sms gateway returned {status}: {body}"
            )));
        }

        Ok(())
    }
}
