//! HTTP webhook transport

use super::{RawReply, SendError, WebhookTransport};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Wire payload posted to the webhook for every user message.
///
/// Field names follow the webhook's contract exactly, including the
/// mixed-case `phone_Number`.
#[derive(Debug, Clone, Serialize)]
pub struct RelayPayload {
    pub messagebody: String,
    #[serde(rename = "phone_Number")]
    pub phone_number: String,
    pub user_id: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Webhook transport over reqwest
pub struct HttpWebhookTransport {
    client: Client,
    endpoint: String,
}

impl HttpWebhookTransport {
    /// `endpoint` is the deployment's webhook URL.
    ///
    /// No request timeout is configured: the send cycle trusts the
    /// transport's own behavior, and a hung request keeps the
    /// conversation busy until the connection dies.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhookTransport {
    async fn relay(&self, payload: &RelayPayload) -> Result<RawReply, SendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SendError::transport(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    SendError::transport(format!("connection failed: {e}"))
                } else {
                    SendError::transport(format!("request failed: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| SendError::transport(format!("failed to read response body: {e}")))?;

        Ok(RawReply {
            status,
            content_type,
            body,
        })
    }
}
