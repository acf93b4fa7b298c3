//! Runtime for executing the send cycle
//!
//! A single event-loop task owns the send-cycle state and applies pure
//! transitions; effects run against the shared conversation. The relay
//! request is spawned so the loop (and read-only API handlers) stay
//! responsive while a request is in flight, and its outcome comes back
//! through the same event channel.

#[cfg(test)]
pub mod testing;

use crate::config::ChatConfig;
use crate::conversation::{Conversation, Message};
use crate::state_machine::{
    transition, ChatState, Effect, Event, SessionContext, TransitionError,
};
use crate::webhook::{normalize_reply, RelayPayload, WebhookTransport};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init {
        session_id: String,
        messages: Vec<Message>,
        busy: bool,
    },
    Message {
        message: Message,
    },
    StateChange {
        busy: bool,
    },
    Notice {
        title: String,
        message: String,
        is_error: bool,
    },
    VoiceCall,
}

/// Transient user-visible alerts; fire-and-forget, no return value.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, is_error: bool);
}

/// Notifier that forwards notices to connected SSE clients
pub struct SseNotifier {
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl SseNotifier {
    pub fn new(broadcast_tx: broadcast::Sender<SseEvent>) -> Self {
        Self { broadcast_tx }
    }
}

impl Notifier for SseNotifier {
    fn notify(&self, title: &str, message: &str, is_error: bool) {
        if is_error {
            tracing::warn!(title, message, "user notification");
        } else {
            tracing::info!(title, message, "user notification");
        }
        let _ = self.broadcast_tx.send(SseEvent::Notice {
            title: title.to_string(),
            message: message.to_string(),
            is_error,
        });
    }
}

/// Side-effect-only trigger for the embedded voice assistant. Takes no
/// conversation state and returns nothing.
pub trait VoiceWidget: Send + Sync {
    fn launch(&self);
}

/// Tells connected clients to mount the voice widget
pub struct SseVoiceWidget {
    broadcast_tx: broadcast::Sender<SseEvent>,
    notifier: Arc<dyn Notifier>,
}

impl SseVoiceWidget {
    pub fn new(broadcast_tx: broadcast::Sender<SseEvent>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            broadcast_tx,
            notifier,
        }
    }
}

impl VoiceWidget for SseVoiceWidget {
    fn launch(&self) {
        tracing::info!("launching voice assistant widget");
        let _ = self.broadcast_tx.send(SseEvent::VoiceCall);
        self.notifier.notify(
            "Voice Call Started",
            "Connecting you to AI voice assistant...",
            false,
        );
    }
}

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ChatHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_tx: broadcast::Sender<SseEvent>,
    pub conversation: Arc<RwLock<Conversation>>,
    pub session_id: String,
}

impl ChatHandle {
    /// Submit user text into the send cycle. Busy and blank submissions
    /// are dropped inside the loop, never queued.
    pub async fn submit(&self, text: String) {
        let _ = self.event_tx.send(Event::Submit { text }).await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// Event-loop runtime driving one conversation
pub struct ChatRuntime<W: WebhookTransport + 'static> {
    context: SessionContext,
    config: ChatConfig,
    state: ChatState,
    conversation: Arc<RwLock<Conversation>>,
    webhook: Arc<W>,
    notifier: Arc<dyn Notifier>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl<W: WebhookTransport + 'static> ChatRuntime<W> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: SessionContext,
        config: ChatConfig,
        conversation: Arc<RwLock<Conversation>>,
        webhook: W,
        notifier: Arc<dyn Notifier>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<SseEvent>,
    ) -> Self {
        Self {
            context,
            config,
            state: ChatState::Idle,
            conversation,
            webhook: Arc::new(webhook),
            notifier,
            event_rx,
            event_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "starting chat runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event).await;
        }

        tracing::info!(session_id = %self.context.session_id, "chat runtime stopped");
    }

    async fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, &self.context, event) {
            Ok(result) => result,
            Err(reason @ (TransitionError::EmptyInput | TransitionError::Busy)) => {
                // Rejected submissions are ignored, never queued.
                tracing::debug!(%reason, "submission dropped");
                return;
            }
            Err(reason) => {
                tracing::warn!(%reason, "event dropped");
                return;
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);

        for effect in result.effects {
            self.execute_effect(effect).await;
        }

        if old_state != self.state {
            let _ = self.broadcast_tx.send(SseEvent::StateChange {
                busy: self.state == ChatState::Sending,
            });
        }
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendUserMessage { text } => {
                match self.conversation.write().await.append_user_message(&text) {
                    Ok(message) => {
                        let _ = self.broadcast_tx.send(SseEvent::Message { message });
                    }
                    Err(reason) => {
                        // The transition already guards both reject cases.
                        tracing::warn!(%reason, "store rejected user message");
                    }
                }
            }
            Effect::RelayToWebhook { text } => self.spawn_relay(text),
            Effect::AppendAgentMessage { text } => {
                let message = self.conversation.write().await.append_agent_message(text);
                let _ = self.broadcast_tx.send(SseEvent::Message { message });
            }
            Effect::FinishSend => {
                self.conversation.write().await.finish_send();
            }
            Effect::Notify {
                title,
                message,
                is_error,
            } => {
                self.notifier.notify(&title, &message, is_error);
            }
        }
    }

    /// Issue the webhook request in a background task; its outcome comes
    /// back as a `ReplyReceived` or `SendFailed` event.
    fn spawn_relay(&self, text: String) {
        let payload = RelayPayload {
            messagebody: text,
            phone_number: self.config.phone_number.clone(),
            user_id: self.config.user_id.clone(),
            session_id: self.context.session_id.clone(),
        };
        let webhook = Arc::clone(&self.webhook);
        let event_tx = self.event_tx.clone();
        let fallback = self.config.fallback_reply.clone();

        tokio::spawn(async move {
            let outcome = match webhook.relay(&payload).await {
                Ok(reply) => normalize_reply(&reply, &fallback),
                Err(e) => Err(e),
            };
            let event = match outcome {
                Ok(text) => Event::ReplyReceived { text },
                Err(e) => {
                    tracing::error!(error = %e, session_id = %payload.session_id, "send failed");
                    Event::SendFailed {
                        message: e.to_string(),
                    }
                }
            };
            let _ = event_tx.send(event).await;
        });
    }
}

/// Wire up and start a runtime for a fresh conversation.
pub fn spawn_chat_runtime<W>(config: &ChatConfig, webhook: W) -> ChatHandle
where
    W: WebhookTransport + 'static,
{
    let conversation = Conversation::new(&config.greeting);
    let session_id = conversation.session_id().to_string();
    let context = SessionContext::new(&session_id);
    let conversation = Arc::new(RwLock::new(conversation));

    let (event_tx, event_rx) = mpsc::channel(32);
    let (broadcast_tx, _) = broadcast::channel(128);
    let notifier: Arc<dyn Notifier> = Arc::new(SseNotifier::new(broadcast_tx.clone()));

    let runtime = ChatRuntime::new(
        context,
        config.clone(),
        Arc::clone(&conversation),
        webhook,
        notifier,
        event_rx,
        event_tx.clone(),
        broadcast_tx.clone(),
    );
    tokio::spawn(runtime.run());

    ChatHandle {
        event_tx,
        broadcast_tx,
        conversation,
        session_id,
    }
}
