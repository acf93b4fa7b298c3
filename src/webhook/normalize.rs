//! Reply normalization
//!
//! The webhook is free to answer with a JSON object, an array of
//! envelopes, a double-encoded JSON string, or plain text. This module
//! reduces every accepted shape to a single display string through an
//! ordered sequence of typed decode attempts; parse failures degrade to
//! the raw body or the configured fallback and never escape as errors.
//! Only a non-2xx status is a failure.

use serde::Deserialize;
use serde_json::Value;

use super::SendError;

/// Raw webhook response. The transport reads the body at most once.
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Envelope carrying the reply text under `output`
#[derive(Debug, Deserialize)]
struct OutputEnvelope {
    output: String,
}

/// Envelope carrying the reply text under `response`
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    response: String,
}

/// Reduce a webhook reply to one display string.
pub fn normalize_reply(reply: &RawReply, fallback: &str) -> Result<String, SendError> {
    if !(200..300).contains(&reply.status) {
        return Err(SendError::Status {
            status: reply.status,
        });
    }

    if is_json(reply.content_type.as_deref()) {
        Ok(extract_display_text(&reply.body, fallback))
    } else {
        Ok(text_or_fallback(&reply.body, fallback))
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/json"))
}

/// Plain-text treatment: the body verbatim, or the fallback when empty.
fn text_or_fallback(body: &str, fallback: &str) -> String {
    if body.trim().is_empty() {
        fallback.to_string()
    } else {
        body.to_string()
    }
}

fn extract_display_text(body: &str, fallback: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<Value>(body) else {
        // Unparseable despite the JSON content-type; fall back to the
        // plain-text treatment of the raw body.
        return text_or_fallback(body, fallback);
    };

    // One extra unwrap level tolerates double-encoded payloads. If the
    // inner parse fails the string itself is the reply.
    if let Value::String(inner) = &value {
        match serde_json::from_str::<Value>(inner) {
            Ok(reparsed) => value = reparsed,
            Err(_) => return inner.clone(),
        }
    }

    decode_reply_shape(&value).unwrap_or_else(|| fallback.to_string())
}

/// Ordered decode attempts, first match wins: array's first element with
/// `output`, then object `output`, then object `response`, then a bare
/// string. A recognized field must hold a string; anything else is "try
/// next" and ultimately the fallback.
fn decode_reply_shape(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items
            .first()
            .and_then(|first| OutputEnvelope::deserialize(first).ok())
            .map(|envelope| envelope.output),
        Value::Object(_) => OutputEnvelope::deserialize(value)
            .map(|envelope| envelope.output)
            .or_else(|_| ResponseEnvelope::deserialize(value).map(|envelope| envelope.response))
            .ok(),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}
