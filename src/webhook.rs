//! Webhook relay
//!
//! The single external wire protocol: one POST per user message, one
//! reply per POST. The transport trait is the seam mocks plug into; the
//! normalizer reduces whatever shape the webhook answers with to one
//! display string.

mod client;
mod error;
mod normalize;

#[cfg(test)]
mod proptests;

pub use client::{HttpWebhookTransport, RelayPayload};
pub use error::SendError;
pub use normalize::{normalize_reply, RawReply};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for posting a user message to the webhook
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Post one user message and return the raw reply.
    ///
    /// The body is read exactly once; any transport-level failure
    /// (connect, timeout, unreadable body) is a [`SendError`].
    async fn relay(&self, payload: &RelayPayload) -> Result<RawReply, SendError>;
}

#[async_trait]
impl<T: WebhookTransport + ?Sized> WebhookTransport for Arc<T> {
    async fn relay(&self, payload: &RelayPayload) -> Result<RawReply, SendError> {
        (**self).relay(payload).await
    }
}

/// Logging wrapper for webhook transports
pub struct LoggingTransport {
    inner: Arc<dyn WebhookTransport>,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn WebhookTransport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl WebhookTransport for LoggingTransport {
    async fn relay(&self, payload: &RelayPayload) -> Result<RawReply, SendError> {
        let start = std::time::Instant::now();
        let result = self.inner.relay(payload).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    session_id = %payload.session_id,
                    duration_ms = %duration.as_millis(),
                    status = reply.status,
                    "webhook relay completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    session_id = %payload.session_id,
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "webhook relay failed"
                );
            }
        }

        result
    }
}
