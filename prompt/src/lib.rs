//! # Prompt
//!
//! Message shapes for chat-completion requests. A [`ChatMessage`] maps
//! one-to-one onto one element of the API `messages` array; a conversation's
//! context window is a `Vec<ChatMessage>` in chronological ascending order.
//!
//! ## External interactions
//!
//! - **AI models**: values here are converted into the OpenAI request types
//!   by the dispatch worker before each call.

use serde::{Deserialize, Serialize};

/// Role of a message, one-to-one with Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message, one-to-one with one element of the API `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// System instruction sent ahead of every context window.
pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are a terse bot in a group chat responding to questions with detail and clearly answers";
