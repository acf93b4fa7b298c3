//! Chatline - webhook-backed chat widget backend
//!
//! A Rust backend implementing the conversation engine for an
//! embeddable chat widget: one conversation, relayed turn by turn to a
//! configured webhook, with the reply normalized into an agent message.

mod api;
mod config;
mod conversation;
mod runtime;
mod state_machine;
mod webhook;

use api::{create_router, AppState};
use config::ChatConfig;
use runtime::{spawn_chat_runtime, SseNotifier, SseVoiceWidget};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webhook::{HttpWebhookTransport, LoggingTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatline=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ChatConfig::from_env();

    match &config.webhook_url {
        Some(url) => tracing::info!(url = %url, "Webhook endpoint configured"),
        None => tracing::warn!(
            "No webhook endpoint configured. Set CHATLINE_WEBHOOK_URL; sends will fail until it is."
        ),
    }

    // Wire up the conversation runtime
    let transport = LoggingTransport::new(Arc::new(HttpWebhookTransport::new(
        config.webhook_url.clone().unwrap_or_default(),
    )));
    let chat = spawn_chat_runtime(&config, transport);
    tracing::info!(session_id = %chat.session_id, "Conversation started");

    let notifier = Arc::new(SseNotifier::new(chat.broadcast_tx.clone()));
    let voice = Arc::new(SseVoiceWidget::new(chat.broadcast_tx.clone(), notifier));
    let state = AppState::new(chat, voice);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Chatline server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
