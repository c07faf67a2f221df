//! The dispatch loop: consumes jobs, calls the AI clients, and appends the
//! reply to the conversation as the sentinel sender.
//!
//! Both variants follow one error policy: any external failure is logged and
//! substituted with a fixed fallback message; nothing propagates out of the
//! worker. Jobs run sequentially in arrival order; no ordering is promised
//! between jobs of different conversations.

use std::sync::Arc;

use chat_core::{MessageKind, AI_SENDER};
use storage::MessageRepository;
use tracing::{error, info, instrument, warn};

use crate::clients::{ChatCompletion, ImageGeneration};
use crate::job::AiJob;
use crate::queue::JobReceiver;

// --- Fallback contents appended when the external call yields nothing ---

/// Appended when the completion API returns success but no content.
pub const NO_RESPONSE_FALLBACK: &str = "I'm sorry, I don't have a response for that.";

/// Appended when the completion API call fails.
pub const REQUEST_FAILED_FALLBACK: &str =
    "I'm sorry, an error occurred while processing your request.";

/// Appended when image generation fails or returns no URL.
pub const IMAGE_FALLBACK_PATH: &str = "/poopenai.png";

/// Consumes [`AiJob`]s until every sender is dropped.
pub struct AiDispatchWorker {
    chat_client: Arc<dyn ChatCompletion>,
    image_client: Arc<dyn ImageGeneration>,
    messages: MessageRepository,
    receiver: JobReceiver,
    system_prompt: String,
}

impl AiDispatchWorker {
    pub fn new(
        chat_client: Arc<dyn ChatCompletion>,
        image_client: Arc<dyn ImageGeneration>,
        messages: MessageRepository,
        receiver: JobReceiver,
        system_prompt: String,
    ) -> Self {
        Self {
            chat_client,
            image_client,
            messages,
            receiver,
            system_prompt,
        }
    }

    /// Runs the loop to completion. Spawn this on its own task; it returns
    /// once all senders are gone and the queue is drained.
    pub async fn run(mut self) {
        info!("AI dispatch worker started");
        while let Some(job) = self.receiver.recv().await {
            self.handle_job(job).await;
        }
        info!("AI dispatch worker stopped");
    }

    async fn handle_job(&self, job: AiJob) {
        match job {
            AiJob::Chat {
                conversation_id,
                context,
            } => self.handle_chat(&conversation_id, context).await,
            AiJob::Image {
                conversation_id,
                prompt,
            } => self.handle_image(&conversation_id, &prompt).await,
        }
    }

    #[instrument(skip(self, context), fields(context_len = context.len()))]
    async fn handle_chat(&self, conversation_id: &str, context: Vec<prompt::ChatMessage>) {
        let mut messages = Vec::with_capacity(context.len() + 1);
        messages.push(prompt::ChatMessage::system(self.system_prompt.clone()));
        messages.extend(context);

        let content = match self.chat_client.complete(&messages).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                warn!(conversation_id = %conversation_id, "Completion returned no content");
                NO_RESPONSE_FALLBACK.to_string()
            }
            Err(e) => {
                error!(conversation_id = %conversation_id, error = %e, "Completion call failed");
                REQUEST_FAILED_FALLBACK.to_string()
            }
        };

        self.append_reply(conversation_id, &content, MessageKind::Text)
            .await;
    }

    #[instrument(skip(self, prompt))]
    async fn handle_image(&self, conversation_id: &str, prompt: &str) {
        let content = match self.image_client.generate(prompt).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                warn!(conversation_id = %conversation_id, "Image generation returned no URL");
                IMAGE_FALLBACK_PATH.to_string()
            }
            Err(e) => {
                error!(conversation_id = %conversation_id, error = %e, "Image generation call failed");
                IMAGE_FALLBACK_PATH.to_string()
            }
        };

        self.append_reply(conversation_id, &content, MessageKind::Image)
            .await;
    }

    /// Appends the sentinel reply. A storage failure here has no caller to
    /// report to, so it is logged and dropped.
    async fn append_reply(&self, conversation_id: &str, content: &str, kind: MessageKind) {
        match self
            .messages
            .append(conversation_id, AI_SENDER, content, kind.as_str(), None)
            .await
        {
            Ok(message) => {
                info!(
                    conversation_id = %conversation_id,
                    message_id = %message.id,
                    kind = %kind,
                    "AI reply appended"
                );
            }
            Err(e) => {
                error!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "Failed to append AI reply"
                );
            }
        }
    }
}
