//! HTTP mail-provider transport.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::types::{EmailMessage, SendReceipt};
use super::{MailError, MailTransport};

/// Mail provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    /// Provider API base URL.
    pub api_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Sender address stamped on every message.
    pub sender: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Mail transport over a provider HTTP API.
///
/// The underlying `reqwest` client pools its connections, so the transport
/// is constructed once and reused across jobs.
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Result<Self, MailError> {
        if config.api_key.is_empty() {
            return Err(MailError::NotConfigured(
                "mail provider API key is required".to_string(),
            ));
        }
        if config.sender.is_empty() {
            return Err(MailError::NotConfigured(
                "sender address is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| MailError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    fn name(&self) -> &str {
        "http-mailer"
    }

    async fn verify(&self) -> Result<(), MailError> {
        let response = self
            .client
            .get(self.endpoint("api/v1/health"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailError::Timeout
                } else {
                    MailError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, MailError> {
        let attachments: Vec<_> = message
            .attachments
            .iter()
            .map(|a| {
                json!({
                    "filename": a.filename,
                    "type": a.content_type,
                    "content": STANDARD.encode(&a.bytes),
                })
            })
            .collect();

        let body = json!({
            "from": self.config.sender,
            "to": message.to,
            "subject": message.subject,
            "html": message.html_body,
            "attachments": attachments,
        });

        debug!(to = %message.to, subject = %message.subject, "sending email");

        let response = self
            .client
            .post(self.endpoint("api/v1/messages"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailError::Timeout
                } else {
                    MailError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| MailError::ParseError(e.to_string()))?;

        Ok(SendReceipt {
            message_id: sent.id,
        })
    }
}
