use serde::Serialize;
use tokio::sync::broadcast;

/// State transitions published by a handler. Consumers subscribe via
/// [`crate::handler::ProtocolHandler::subscribe`] and decide how to render
/// them; the engine never talks to a UI directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HandlerEvent {
    Connecting,
    Connected,
    Disconnected,
    Reading,
    Retrying { attempt: usize, max_retries: usize },
    Error { message: String },
}

pub type Sender = broadcast::Sender<HandlerEvent>;
pub type Receiver = broadcast::Receiver<HandlerEvent>;

pub fn channel() -> Sender {
    broadcast::channel(64).0
}

/// Send that tolerates having no subscribers; events are advisory.
pub fn emit(tx: &Sender, event: HandlerEvent) {
    let _ = tx.send(event);
}
