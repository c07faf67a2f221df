//! Core types: caller context, message kinds, and the AI sender sentinel.

use serde::{Deserialize, Serialize};

/// Sender identifier for AI-authored messages. Not a user id; exempt from
/// conversation membership checks.
pub const AI_SENDER: &str = "ChatGPT";

/// Identity of the caller for one request.
///
/// Built once at the server boundary from the `Authorization` header and
/// passed by reference into every operation; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerContext {
    /// Opaque token from the identity provider; `None` for anonymous callers.
    pub token: Option<String>,
}

impl CallerContext {
    /// Context for a request with no verified identity.
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Context carrying a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// Kind of a message's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    File,
}

impl MessageKind {
    /// Column value for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::File => "file",
        }
    }

    /// Parses a stored column value; `None` for anything outside the four literals.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(MessageKind::Text),
            "image" => Some(MessageKind::Image),
            "video" => Some(MessageKind::Video),
            "file" => Some(MessageKind::File),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
