//! Send-cycle state types

use serde::{Deserialize, Serialize};

/// State of the send cycle.
///
/// Exactly one webhook request may be in flight, and only while in
/// `Sending`; the cycle always returns to `Idle`, with or without a
/// reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatState {
    /// Ready for user input, no request in flight.
    #[default]
    Idle,

    /// A relay request is in flight. New submissions are rejected, not
    /// queued, and the request cannot be aborted.
    Sending,
}

impl ChatState {
    /// Check if a submit would currently be accepted.
    #[allow(dead_code)] // State query utility
    pub fn accepts_input(self) -> bool {
        matches!(self, ChatState::Idle)
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Correlation token sent with every outbound request.
    pub session_id: String,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}
