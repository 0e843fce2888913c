use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::{require, EmailSettings};
use crate::notify::NotificationChannel;
use crate::utils::error::{AppError, Result};

const SUBJECT: &str = "Price watch alert";

/// SMTP delivery of the alert, mailed to the watching address itself.
/// Present as an alternate channel; the default channel choice is SMS.
pub struct EmailChannel {
    settings: EmailSettings,
}

impl EmailChannel {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, message: &str) -> Result<()> {
        let address = require(&self.settings.address, "EMAIL_ADDRESS")?;
        let password = require(&self.settings.password, "EMAIL_PASSWORD")?;

        let mailbox: Mailbox = address
            .parse()
            .map_err(|e| AppError::Config(format!("invalid EMAIL_ADDRESS: {e}")))?;

        let email = Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(SUBJECT)
            .body(message.to_string())
            .map_err(|e| AppError::Delivery(format!("building email failed: {e}")))?;

        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_host)
                .map_err(|e| AppError::Delivery(format!("smtp relay setup failed: {e}")))?
                .port(self.settings.smtp_port)
                .credentials(Credentials::new(address.to_string(), password.to_string()))
                .build();

        let response = transport
            .send(email)
            .await
            .map_err(|e| AppError::Delivery(format!("smtp send failed: {e}")))?;
        debug!(code = %response.code(), "smtp server response");

        Ok(())
    }
}
