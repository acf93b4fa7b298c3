//! Server-Sent Events support

use crate::runtime::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    init_event: SseEvent,
    broadcast_rx: tokio::sync::broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Create stream that starts with init event then broadcasts
    let init = futures::stream::once(async move { Ok(sse_event_to_axum(init_event)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(sse_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn sse_event_to_axum(event: SseEvent) -> Event {
    let (event_type, data) = match event {
        SseEvent::Init {
            session_id,
            messages,
            busy,
        } => (
            "init",
            json!({
                "type": "init",
                "session_id": session_id,
                "messages": messages,
                "busy": busy
            }),
        ),
        SseEvent::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        SseEvent::StateChange { busy } => (
            "state_change",
            json!({
                "type": "state_change",
                "busy": busy
            }),
        ),
        SseEvent::Notice {
            title,
            message,
            is_error,
        } => (
            "notice",
            json!({
                "type": "notice",
                "title": title,
                "message": message,
                "is_error": is_error
            }),
        ),
        SseEvent::VoiceCall => (
            "voice_call",
            json!({
                "type": "voice_call"
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}
