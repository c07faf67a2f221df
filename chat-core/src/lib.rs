//! # chat-core
//!
//! Core types shared across the chat backend: [`CallerContext`], [`MessageKind`],
//! the AI sender sentinel, the error taxonomy, and tracing initialization.
//! Transport-agnostic; used by storage, chat-service, ai-dispatch, and chat-server.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{ChatError, Result};
pub use logger::init_tracing;
pub use types::{CallerContext, MessageKind, AI_SENDER};
