//! Job descriptors published by the send path and consumed by the worker.

use prompt::ChatMessage;

/// One scheduled AI invocation. Built at send time, after the triggering
/// message is durably stored; the chat variant carries the already-assembled
/// context window so the worker never re-reads history.
#[derive(Debug, Clone)]
pub enum AiJob {
    /// Text completion for a `@gpt` message.
    Chat {
        conversation_id: String,
        /// Context entries, chronological ascending, the triggering text last.
        context: Vec<ChatMessage>,
    },
    /// Image generation for a `@dall-e` message.
    Image {
        conversation_id: String,
        /// The raw triggering message text, prefix included.
        prompt: String,
    },
}

impl AiJob {
    pub fn conversation_id(&self) -> &str {
        match self {
            AiJob::Chat {
                conversation_id, ..
            } => conversation_id,
            AiJob::Image {
                conversation_id, ..
            } => conversation_id,
        }
    }
}
