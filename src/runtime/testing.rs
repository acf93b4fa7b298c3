//! Mock implementations for testing
//!
//! These mocks enable driving full send cycles without real I/O.

use super::{Notifier, SseEvent};
use crate::webhook::{RawReply, RelayPayload, SendError, WebhookTransport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, Notify};

// ============================================================================
// Mock Webhook Transport
// ============================================================================

/// Mock transport that returns queued replies and records payloads
pub struct MockWebhookTransport {
    replies: Mutex<VecDeque<Result<RawReply, SendError>>>,
    payloads: Mutex<Vec<RelayPayload>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockWebhookTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            payloads: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: RawReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a transport failure
    pub fn queue_error(&self, error: SendError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Hold every relay until the returned gate is notified (for
    /// exercising the busy window).
    pub fn hold_replies(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Get recorded payloads
    pub fn recorded_payloads(&self) -> Vec<RelayPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

impl Default for MockWebhookTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookTransport for MockWebhookTransport {
    async fn relay(&self, payload: &RelayPayload) -> Result<RawReply, SendError> {
        self.payloads.lock().unwrap().push(payload.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SendError::transport("no mock reply queued")))
    }
}

// ============================================================================
// Recording Notifier
// ============================================================================

/// Notifier that records every (title, message, is_error) triple. Like the
/// production `SseNotifier`, it also forwards each notice to the broadcast
/// channel when one is wired, so end-to-end tests can observe notices.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(String, String, bool)>>,
    broadcast_tx: Option<broadcast::Sender<SseEvent>>,
}

impl RecordingNotifier {
    /// Recording notifier that also mirrors notices onto the SSE broadcast
    /// channel, matching the production `SseNotifier`.
    pub fn with_broadcast(broadcast_tx: broadcast::Sender<SseEvent>) -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            broadcast_tx: Some(broadcast_tx),
        }
    }

    pub fn notices(&self) -> Vec<(String, String, bool)> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str, is_error: bool) {
        self.notices
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string(), is_error));
        if let Some(broadcast_tx) = &self.broadcast_tx {
            let _ = broadcast_tx.send(SseEvent::Notice {
                title: title.to_string(),
                message: message.to_string(),
                is_error,
            });
        }
    }
}
