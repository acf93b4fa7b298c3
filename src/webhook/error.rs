//! Webhook send errors

use thiserror::Error;

/// A failed send cycle.
///
/// Transport failures and non-2xx statuses are deliberately collapsed:
/// the widget surfaces a single "failed to send" notification either
/// way, and there is no retry logic to feed a finer classification.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("webhook returned HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {message}")]
    Transport { message: String },
}

impl SendError {
    pub fn transport(message: impl Into<String>) -> Self {
        SendError::Transport {
            message: message.into(),
        }
    }
}
