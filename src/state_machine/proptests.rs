//! Property-based tests for the send-cycle state machine
//!
//! These tests verify key invariants hold across all possible inputs:
//! - The transition function is total (no panics, every pair handled)
//! - Submissions are only accepted while idle and never queued
//! - The conversation's busy flag stays in lockstep with the state
//! - Messages are append-only under every event sequence

use super::state::{ChatState, SessionContext};
use super::transition::{transition, TransitionError};
use super::{Effect, Event};
use crate::conversation::Conversation;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_state() -> impl Strategy<Value = ChatState> {
    prop_oneof![Just(ChatState::Idle), Just(ChatState::Sending)]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[ -~]{0,40}".prop_map(|text| Event::Submit { text }),
        "[a-zA-Z0-9 ]{1,40}".prop_map(|text| Event::ReplyReceived { text }),
        "[a-zA-Z0-9 ]{1,40}".prop_map(|message| Event::SendFailed { message }),
    ]
}

fn test_context() -> SessionContext {
    SessionContext::new("session_prop")
}

/// Apply a transition's effects to a conversation the way the runtime
/// does, minus the I/O.
fn apply_effects(conversation: &mut Conversation, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::AppendUserMessage { text } => {
                conversation
                    .append_user_message(text)
                    .expect("transition accepted text the store rejected");
            }
            Effect::AppendAgentMessage { text } => {
                conversation.append_agent_message(text.clone());
            }
            Effect::FinishSend => conversation.finish_send(),
            Effect::RelayToWebhook { .. } | Effect::Notify { .. } => {}
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every (state, event) pair either transitions or rejects; nothing
    /// panics.
    #[test]
    fn transition_is_total(state in arb_state(), event in arb_event()) {
        let _ = transition(&state, &test_context(), event);
    }

    /// A non-blank submit from idle always starts a send: user append
    /// first, relay second, same text in both.
    #[test]
    fn idle_submit_appends_then_relays(text in "[a-zA-Z0-9 ]{1,40}") {
        prop_assume!(!text.trim().is_empty());
        let result = transition(
            &ChatState::Idle,
            &test_context(),
            Event::Submit { text: text.clone() },
        ).unwrap();

        prop_assert_eq!(result.new_state, ChatState::Sending);
        prop_assert_eq!(result.effects, vec![
            Effect::AppendUserMessage { text: text.clone() },
            Effect::RelayToWebhook { text },
        ]);
    }

    /// Submissions while sending are always rejected as busy.
    #[test]
    fn sending_rejects_every_submit(text in "[ -~]{0,40}") {
        let err = transition(
            &ChatState::Sending,
            &test_context(),
            Event::Submit { text },
        ).unwrap_err();
        prop_assert_eq!(err, TransitionError::Busy);
    }

    /// Either cycle outcome returns to idle.
    #[test]
    fn outcomes_return_to_idle(event in prop_oneof![
        "[a-zA-Z0-9 ]{1,40}".prop_map(|text| Event::ReplyReceived { text }),
        "[a-zA-Z0-9 ]{1,40}".prop_map(|message| Event::SendFailed { message }),
    ]) {
        let result = transition(&ChatState::Sending, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, ChatState::Idle);
    }

    /// Driving a conversation through arbitrary event sequences keeps the
    /// busy flag in lockstep with the state and never loses a message.
    #[test]
    fn busy_flag_tracks_state_and_messages_only_grow(
        events in proptest::collection::vec(arb_event(), 0..25),
    ) {
        let mut conversation = Conversation::new("greeting");
        let context = SessionContext::new(conversation.session_id());
        let mut state = ChatState::Idle;
        let mut last_count = conversation.messages().len();

        for event in events {
            if let Ok(result) = transition(&state, &context, event) {
                state = result.new_state;
                apply_effects(&mut conversation, &result.effects);
            }

            prop_assert_eq!(
                conversation.is_busy(),
                state == ChatState::Sending,
                "busy flag out of lockstep"
            );
            prop_assert!(conversation.messages().len() >= last_count);
            last_count = conversation.messages().len();
        }
    }
}
