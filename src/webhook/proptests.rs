//! Property-based tests for reply normalization
//!
//! These tests verify the normalizer's core guarantees:
//! - It never panics, whatever the webhook sends back
//! - Every 2xx reply produces a display string
//! - Every non-2xx reply is a send failure
//! - The display text is never invented out of thin air

use super::normalize::{normalize_reply, RawReply};
use super::SendError;
use proptest::prelude::*;

const FALLBACK: &str = "Thank you for your message. How can I assist you today?";

// ============================================================================
// Strategies
// ============================================================================

fn arb_content_type() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("application/json".to_string())),
        Just(Some("application/json; charset=utf-8".to_string())),
        Just(Some("text/plain".to_string())),
        Just(Some("text/html".to_string())),
        Just(Some("application/octet-stream".to_string())),
    ]
}

/// Bodies spanning valid JSON, broken JSON, and arbitrary text
fn arb_body() -> impl Strategy<Value = String> {
    prop_oneof![
        // Arbitrary text; no quotes or backslashes, so a body that
        // happens to parse as JSON carries no escape sequences
        "[a-zA-Z0-9 ,.:;!?(){}\\[\\]-]{0,80}",
        // Well-formed envelope shapes
        "[a-zA-Z0-9 ]{0,40}".prop_map(|s| format!("{{\"output\":{}}}", json_str(&s))),
        "[a-zA-Z0-9 ]{0,40}".prop_map(|s| format!("{{\"response\":{}}}", json_str(&s))),
        "[a-zA-Z0-9 ]{0,40}".prop_map(|s| format!("[{{\"output\":{}}}]", json_str(&s))),
        // Bare JSON strings and double-encoded envelopes
        "[a-zA-Z0-9 ]{0,40}".prop_map(|s| json_str(&s)),
        "[a-zA-Z0-9 ]{0,40}"
            .prop_map(|s| json_str(&format!("[{{\"output\":{}}}]", json_str(&s)))),
        // Non-envelope and broken JSON
        proptest::sample::select(vec!["42", "null", "[]", "{}", "{bad", "[1,"])
            .prop_map(String::from),
    ]
}

fn json_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Any 2xx reply normalizes to a display string, never an error.
    #[test]
    fn success_replies_always_produce_text(
        status in 200u16..300,
        content_type in arb_content_type(),
        body in arb_body(),
    ) {
        let reply = RawReply { status, content_type, body };
        let out = normalize_reply(&reply, FALLBACK);
        prop_assert!(out.is_ok());
    }

    /// The display string is never invented: it is either the configured
    /// fallback or text that came from the reply body. (The generated
    /// payloads contain no escape sequences, so decoded text appears
    /// verbatim in the body.)
    #[test]
    fn display_text_comes_from_reply_or_fallback(
        content_type in arb_content_type(),
        body in arb_body(),
    ) {
        let reply = RawReply { status: 200, content_type, body: body.clone() };
        let out = normalize_reply(&reply, FALLBACK).unwrap();
        prop_assert!(out == FALLBACK || body.contains(&out));
    }

    /// Every non-2xx status is a send failure carrying that status.
    #[test]
    fn error_statuses_always_fail(
        status in prop_oneof![100u16..200, 300u16..600],
        content_type in arb_content_type(),
        body in arb_body(),
    ) {
        let reply = RawReply { status, content_type, body };
        match normalize_reply(&reply, FALLBACK) {
            Err(SendError::Status { status: s }) => prop_assert_eq!(s, status),
            other => prop_assert!(false, "expected status failure, got {:?}", other.is_ok()),
        }
    }

    /// Plain-text replies with a non-blank body pass through verbatim.
    #[test]
    fn text_bodies_pass_through(body in "[ -~]{1,80}") {
        prop_assume!(!body.trim().is_empty());
        let reply = RawReply {
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: body.clone(),
        };
        prop_assert_eq!(normalize_reply(&reply, FALLBACK).unwrap(), body);
    }

    /// Envelope arrays always surface the first element's output.
    #[test]
    fn envelope_arrays_surface_first_output(
        first in "[a-zA-Z0-9 ]{1,40}",
        second in "[a-zA-Z0-9 ]{1,40}",
    ) {
        let body = format!(
            "[{{\"output\":{}}},{{\"output\":{}}}]",
            json_str(&first),
            json_str(&second)
        );
        let reply = RawReply {
            status: 200,
            content_type: Some("application/json".to_string()),
            body,
        };
        prop_assert_eq!(normalize_reply(&reply, FALLBACK).unwrap(), first);
    }
}
