//! Conversation state: the ordered message list, the busy flag, and the
//! per-session correlation token
//!
//! This is the sole mutable state of the system. Messages are append-only
//! and never re-sorted; the busy flag enforces "at most one send in
//! flight" by rejecting new user messages while set.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Agent,
}

/// A single chat message, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// Rejected appends. Both cases are silent no-ops at the UI boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppendError {
    #[error("message text is empty")]
    EmptyInput,
    #[error("a send is already in flight")]
    Busy,
}

/// One conversation: seeded greeting, append-only messages, busy flag,
/// and an immutable session token.
///
/// Lives for the duration of the process; never persisted.
#[derive(Debug, Clone)]
pub struct Conversation {
    session_id: String,
    messages: Vec<Message>,
    busy: bool,
}

impl Conversation {
    /// Create a conversation seeded with one agent greeting message.
    pub fn new(greeting: &str) -> Self {
        Self {
            session_id: generate_session_id(),
            messages: vec![Message::new(Sender::Agent, greeting)],
            busy: false,
        }
    }

    /// Correlation token sent with every outbound request.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Read-only snapshot in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append the user's message and mark the send cycle busy.
    ///
    /// Rejected (no-op) for blank text or while a send is in flight.
    pub fn append_user_message(&mut self, text: &str) -> Result<Message, AppendError> {
        if text.trim().is_empty() {
            return Err(AppendError::EmptyInput);
        }
        if self.busy {
            return Err(AppendError::Busy);
        }
        let message = Message::new(Sender::User, text);
        self.messages.push(message.clone());
        self.busy = true;
        Ok(message)
    }

    /// Append the agent's reply. Always completes the send cycle: the
    /// busy flag is cleared unconditionally.
    pub fn append_agent_message(&mut self, text: impl Into<String>) -> Message {
        self.busy = false;
        let message = Message::new(Sender::Agent, text);
        self.messages.push(message.clone());
        message
    }

    /// Complete the send cycle without appending a reply (failure path).
    pub fn finish_send(&mut self) {
        self.busy = false;
    }
}

/// Opaque per-conversation token, never reused across conversations.
fn generate_session_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
}
