//! # chat-service
//!
//! The chat operations behind the HTTP surface: identity resolution,
//! conversation membership checks, message send/list/delete, user and
//! presence management, and the hand-off to [`ai_dispatch`] when a message
//! carries a trigger prefix.
//!
//! ## Modules
//!
//! - [`service`] – ChatService and the listing display types
//! - [`context`] – context window assembly for chat-completion jobs
//! - [`trigger`] – trigger-prefix detection
//! - [`object_store`] – seam to the binary object store

pub mod context;
pub mod object_store;
pub mod service;
pub mod trigger;

pub use context::{build_context_window, CONTEXT_WINDOW_SIZE};
pub use object_store::ObjectStore;
pub use service::{ChatService, MessageWithSender, NewConversation, SenderDisplay};
pub use trigger::Trigger;
