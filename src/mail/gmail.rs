// Gmail API sender.
//
// Credentials are an authorized-user token file (the JSON written by
// Google's installed-app flow): a long-lived refresh token plus a short-lived
// access token with its expiry. The initial authorization happens out of
// band; this module only refreshes and uses it. Messages are built as MIME
// with lettre, base64url-encoded, and posted to users.messages.send.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::traits::{build_message, MailSender, OutgoingMail, SendReceipt};
use crate::store::write_atomic;

pub const GMAIL_SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Access tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Contents of the token file. Unknown fields (scopes, token_uri, ...) are
/// carried through untouched when the file is rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(
        rename = "token",
        alias = "access_token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthorizedUser {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Gmail token {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid Gmail token file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &json)
    }

    /// An access token with no recorded expiry counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.expiry) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(_), Some(expiry)) => now + Duration::seconds(EXPIRY_MARGIN_SECS) < expiry,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct RawMessage<'a> {
    raw: &'a str,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

/// Gmail REST API transport.
pub struct GmailSender {
    client: reqwest::Client,
    token_path: PathBuf,
    token_url: String,
    send_url: String,
}

impl GmailSender {
    pub fn new(token_path: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("paperwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            token_path: token_path.into(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            send_url: GMAIL_SEND_URL.to_string(),
        })
    }

    /// Point the sender at different OAuth and send endpoints.
    pub fn with_endpoints(mut self, token_url: &str, send_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self.send_url = send_url.to_string();
        self
    }

    /// Return a usable access token, refreshing and persisting it if needed.
    async fn access_token(&self) -> Result<String> {
        let mut user = AuthorizedUser::load(&self.token_path)?;
        if user.is_fresh(Utc::now()) {
            if let Some(token) = &user.access_token {
                debug!("Gmail access token still valid");
                return Ok(token.clone());
            }
        }

        let token = self.refresh(&mut user).await?;
        user.save(&self.token_path)
            .context("Failed to persist refreshed Gmail token")?;
        Ok(token)
    }

    async fn refresh(&self, user: &mut AuthorizedUser) -> Result<String> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", user.refresh_token.as_str()),
                ("client_id", user.client_id.as_str()),
                ("client_secret", user.client_secret.as_str()),
            ])
            .send()
            .await
            .context("OAuth token refresh request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OAuth token endpoint returned {}: {}", status, body);
        }

        let refreshed: TokenResponse = response
            .json()
            .await
            .context("Failed to parse OAuth token response")?;

        user.access_token = Some(refreshed.access_token.clone());
        user.expiry = refreshed
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        if let Some(rotated) = refreshed.refresh_token {
            user.refresh_token = rotated;
        }

        info!(expiry = ?user.expiry, "Refreshed Gmail access token");
        Ok(refreshed.access_token)
    }
}

#[async_trait]
impl MailSender for GmailSender {
    async fn send(&self, mail: &OutgoingMail) -> Result<SendReceipt> {
        let token = self.access_token().await?;
        let message = build_message(mail)?;
        let raw = URL_SAFE.encode(message.formatted());

        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(token)
            .json(&RawMessage { raw: &raw })
            .send()
            .await
            .context("Gmail send request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gmail API returned {}: {}", status, body);
        }

        let sent: SentMessage = response
            .json()
            .await
            .context("Failed to parse Gmail send response")?;

        info!(to = %mail.to, id = %sent.id, "Email sent via Gmail API");
        Ok(SendReceipt {
            message_id: sent.id,
        })
    }

    async fn refresh_credentials(&self) -> Result<()> {
        self.access_token().await.map(|_| ())
    }
}
