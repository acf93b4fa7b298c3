//! Deployment configuration
//!
//! Everything deployment-specific lives here: the webhook endpoint, the
//! static identifiers sent with every relay, and the canned text the
//! widget falls back to when the webhook gives it nothing displayable.

/// Reply used when the webhook response has no recognizable shape.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "Thank you for your message. How can I assist you today?";

/// Agent greeting seeded into every new conversation.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your AI assistant. How can I help you today?";

const DEFAULT_PORT: u16 = 8000;

/// Configuration for the chat backend
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Webhook endpoint that receives user messages. Sends fail until set.
    pub webhook_url: Option<String>,
    /// Static per-deployment identifier sent as `phone_Number`.
    pub phone_number: String,
    /// Static per-deployment identifier sent as `user_id`.
    pub user_id: String,
    /// Display text used when no reply shape is recognized.
    pub fallback_reply: String,
    /// Greeting text for the seeded agent message.
    pub greeting: String,
    /// Port the HTTP API listens on.
    pub port: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            phone_number: String::new(),
            user_id: String::new(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            webhook_url: std::env::var("CHATLINE_WEBHOOK_URL").ok(),
            phone_number: std::env::var("CHATLINE_PHONE_NUMBER").unwrap_or_default(),
            user_id: std::env::var("CHATLINE_USER_ID").unwrap_or_default(),
            fallback_reply: std::env::var("CHATLINE_FALLBACK_REPLY")
                .unwrap_or(defaults.fallback_reply),
            greeting: std::env::var("CHATLINE_GREETING").unwrap_or(defaults.greeting),
            port: std::env::var("CHATLINE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}
