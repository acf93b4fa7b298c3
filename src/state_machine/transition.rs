//! Pure state transition function

use super::{ChatState, Effect, Event, SessionContext};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Rejected or impossible transitions. Submission rejections are
/// silently dropped by the runtime; they never surface to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("submitted text is empty")]
    EmptyInput,
    #[error("a send is already in flight, submission ignored")]
    Busy,
    #[error("unexpected {event} while {state}")]
    UnexpectedEvent {
        state: &'static str,
        event: &'static str,
    },
}

/// Pure transition function
///
/// Given the same inputs, this always produces the same outputs, with no
/// I/O side effects; the runtime executes the returned effects.
pub fn transition(
    state: &ChatState,
    _context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Idle + Submit -> Sending. The store append precedes the
        // outbound request.
        (ChatState::Idle, Event::Submit { text }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            Ok(TransitionResult::new(ChatState::Sending)
                .with_effect(Effect::AppendUserMessage { text: text.clone() })
                .with_effect(Effect::RelayToWebhook { text }))
        }

        // Submissions while a request is in flight are ignored, not queued.
        (ChatState::Sending, Event::Submit { .. }) => Err(TransitionError::Busy),

        // Sending + ReplyReceived -> Idle with the agent's message.
        (ChatState::Sending, Event::ReplyReceived { text }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::AppendAgentMessage { text }))
        }

        // Sending + SendFailed -> Idle. No agent message; the user gets a
        // transient notification instead.
        (ChatState::Sending, Event::SendFailed { .. }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::FinishSend)
                .with_effect(Effect::notify_send_failed()))
        }

        // Stale outcomes with no request in flight.
        (ChatState::Idle, Event::ReplyReceived { .. }) => Err(TransitionError::UnexpectedEvent {
            state: "idle",
            event: "reply_received",
        }),
        (ChatState::Idle, Event::SendFailed { .. }) => Err(TransitionError::UnexpectedEvent {
            state: "idle",
            event: "send_failed",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> SessionContext {
        SessionContext::new("session_test")
    }

    #[test]
    fn idle_submit_starts_send_cycle() {
        let result = transition(
            &ChatState::Idle,
            &test_context(),
            Event::Submit {
                text: "Hi".to_string(),
            },
        )
        .unwrap();

        assert_eq!(result.new_state, ChatState::Sending);
        assert_eq!(
            result.effects,
            vec![
                Effect::AppendUserMessage {
                    text: "Hi".to_string()
                },
                Effect::RelayToWebhook {
                    text: "Hi".to_string()
                },
            ]
        );
    }

    #[test]
    fn blank_submit_is_rejected() {
        for text in ["", "   ", "\n\t"] {
            let err = transition(
                &ChatState::Idle,
                &test_context(),
                Event::Submit {
                    text: text.to_string(),
                },
            )
            .unwrap_err();
            assert_eq!(err, TransitionError::EmptyInput);
        }
    }

    #[test]
    fn submit_while_sending_is_rejected() {
        let err = transition(
            &ChatState::Sending,
            &test_context(),
            Event::Submit {
                text: "again".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::Busy);
    }

    #[test]
    fn reply_completes_cycle_with_agent_message() {
        let result = transition(
            &ChatState::Sending,
            &test_context(),
            Event::ReplyReceived {
                text: "Hello back".to_string(),
            },
        )
        .unwrap();

        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::AppendAgentMessage {
                text: "Hello back".to_string()
            }]
        );
    }

    #[test]
    fn failure_completes_cycle_with_notification_only() {
        let result = transition(
            &ChatState::Sending,
            &test_context(),
            Event::SendFailed {
                message: "HTTP 500".to_string(),
            },
        )
        .unwrap();

        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(result.effects.len(), 2);
        assert_eq!(result.effects[0], Effect::FinishSend);
        assert!(matches!(
            &result.effects[1],
            Effect::Notify { is_error: true, .. }
        ));
    }

    #[test]
    fn stale_outcomes_while_idle_are_errors() {
        let reply = transition(
            &ChatState::Idle,
            &test_context(),
            Event::ReplyReceived {
                text: "late".to_string(),
            },
        );
        assert!(matches!(
            reply,
            Err(TransitionError::UnexpectedEvent { .. })
        ));

        let failed = transition(
            &ChatState::Idle,
            &test_context(),
            Event::SendFailed {
                message: "late".to_string(),
            },
        );
        assert!(matches!(
            failed,
            Err(TransitionError::UnexpectedEvent { .. })
        ));
    }
}
