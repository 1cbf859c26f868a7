// Mail sender trait: the swap-ready delivery abstraction.
//
// The dispatcher only needs two things from a transport: send one message,
// and keep its credentials fresh on days nothing is sent. Gmail's OAuth
// tokens expire if unused, so the refresh call runs every day.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::Message;

/// A fully addressed message with both plain-text and HTML bodies.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Proof of delivery returned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SendReceipt {
    pub message_id: String,
}

/// Trait for delivering the digest.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<SendReceipt>;

    /// Refresh credentials without sending anything. Transports with
    /// long-lived credentials keep the default no-op.
    async fn refresh_credentials(&self) -> Result<()> {
        Ok(())
    }
}

/// Build a multipart/alternative MIME message (plain text first, then HTML).
pub fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let from: Mailbox = mail.from.parse().context("Invalid from email address")?;
    let to: Mailbox = mail.to.parse().context("Invalid to email address")?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(mail.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(mail.html_body.clone()),
                ),
        )
        .context("Failed to build email message")
}
