//! API request and response types

use crate::conversation::Message;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub queued: bool,
}

/// Conversation snapshot
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub session_id: String,
    pub busy: bool,
    pub messages: Vec<Message>,
}

/// Response for side-effect actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
