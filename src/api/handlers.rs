//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{ChatRequest, ChatResponse, ConversationResponse, SuccessResponse};
use super::AppState;
use crate::runtime::SseEvent;
use axum::response::sse::{Event, Sse};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use std::convert::Infallible;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Conversation snapshot
        .route("/api/conversation", get(get_conversation))
        // User actions
        .route("/api/conversation/chat", post(send_chat))
        .route("/api/conversation/voice-call", post(start_voice_call))
        // SSE streaming
        .route("/api/conversation/stream", get(stream_conversation))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Conversation Snapshot
// ============================================================

async fn get_conversation(State(state): State<AppState>) -> Json<ConversationResponse> {
    let conversation = state.chat.conversation.read().await;
    Json(ConversationResponse {
        session_id: conversation.session_id().to_string(),
        busy: conversation.is_busy(),
        messages: conversation.messages().to_vec(),
    })
}

// ============================================================
// User Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    // Busy and blank submissions are dropped inside the loop, never
    // queued; the widget treats both as silent no-ops.
    state.chat.submit(request.text).await;
    Json(ChatResponse { queued: true })
}

async fn start_voice_call(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.voice.launch();
    Json(SuccessResponse { success: true })
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_conversation(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = {
        let conversation = state.chat.conversation.read().await;
        SseEvent::Init {
            session_id: conversation.session_id().to_string(),
            messages: conversation.messages().to_vec(),
            busy: conversation.is_busy(),
        }
    };

    sse_stream(init, state.chat.subscribe())
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("chatline ", env!("CARGO_PKG_VERSION"))
}
