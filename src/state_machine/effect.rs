//! Effects produced by state transitions

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append the user's message to the conversation (sets busy).
    AppendUserMessage { text: String },

    /// Issue the outbound webhook request.
    RelayToWebhook { text: String },

    /// Append the agent's reply to the conversation (clears busy).
    AppendAgentMessage { text: String },

    /// Complete the send cycle without a reply (clears busy).
    FinishSend,

    /// Show a transient user-visible notification.
    Notify {
        title: String,
        message: String,
        is_error: bool,
    },
}

impl Effect {
    pub fn notify_send_failed() -> Self {
        Effect::Notify {
            title: "Error".to_string(),
            message: "Failed to send message. Please try again.".to_string(),
            is_error: true,
        }
    }
}
