//! Events that can occur in a conversation

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user submitted text from the input box.
    Submit { text: String },

    /// The webhook reply arrived and normalized into display text.
    ReplyReceived { text: String },

    /// The relay failed: transport error or non-2xx status. The message
    /// is for the log; the user sees a fixed notification.
    SendFailed { message: String },
}
