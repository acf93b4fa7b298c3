//! HTTP API for the chat widget

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::{ChatHandle, VoiceWidget};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatHandle,
    pub voice: Arc<dyn VoiceWidget>,
}

impl AppState {
    pub fn new(chat: ChatHandle, voice: Arc<dyn VoiceWidget>) -> Self {
        Self { chat, voice }
    }
}
