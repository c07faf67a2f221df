//! Client seams for the dispatch worker.
//!
//! The worker talks to traits so tests can substitute stubs; the OpenAI-backed
//! implementations convert [`prompt::ChatMessage`] values into the request
//! types of the underlying clients.

use async_trait::async_trait;
use prompt::{ChatMessage, MessageRole};

use openai_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, OpenAIClient,
};

/// Chat-completion endpoint: ordered role/content entries in, generated
/// content out. `Ok(None)` means the call succeeded but produced no content.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<Option<String>>;
}

/// Image-generation endpoint: prompt in, image URL out. `Ok(None)` means the
/// call succeeded but returned no URL.
#[async_trait]
pub trait ImageGeneration: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Converts one context entry into the corresponding OpenAI request message.
fn chat_message_to_openai(msg: &ChatMessage) -> anyhow::Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}

/// [`ChatCompletion`] backed by the OpenAI chat client.
#[derive(Clone)]
pub struct OpenAiChatCompletion {
    client: OpenAIClient,
    model: String,
}

impl OpenAiChatCompletion {
    pub fn new(client: OpenAIClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChatCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<Option<String>> {
        let mut openai_messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(messages.len());
        for msg in messages {
            openai_messages.push(chat_message_to_openai(msg)?);
        }
        self.client
            .chat_completion(&self.model, openai_messages)
            .await
    }
}

/// [`ImageGeneration`] backed by the DALL-E client.
#[derive(Clone)]
pub struct OpenAiImageGeneration {
    client: image_generation_client::ImageGenerationClient,
}

impl OpenAiImageGeneration {
    pub fn new(client: image_generation_client::ImageGenerationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageGeneration for OpenAiImageGeneration {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.client.generate_image(prompt).await
    }
}
