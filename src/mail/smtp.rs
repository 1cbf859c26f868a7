// SMTP sender: STARTTLS relay with username/password.
//
// The alternative to the Gmail API for accounts with an app password or a
// self-hosted relay. Credentials don't expire, so there is nothing to
// refresh.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::info;

use super::traits::{build_message, MailSender, OutgoingMail, SendReceipt};
use crate::config::SmtpConfig;

pub struct SmtpSender {
    config: SmtpConfig,
}

impl SmtpSender {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailSender for SmtpSender {
    async fn send(&self, mail: &OutgoingMail) -> Result<SendReceipt> {
        let message = build_message(mail)?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                .context("Failed to create SMTP transport")?
                .port(self.config.port)
                .credentials(creds)
                .build();

        let response = mailer
            .send(message)
            .await
            .context("Failed to send email via SMTP")?;

        // Relays report the queued message id in the final response line
        let message_id = response.message().collect::<Vec<_>>().join(" ");
        info!(to = %mail.to, host = %self.config.host, "Email sent via SMTP");

        Ok(SendReceipt { message_id })
    }
}
