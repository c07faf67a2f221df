//! # ai-dispatch
//!
//! Decouples AI calls from the message-send request cycle. The send path
//! publishes an [`AiJob`] through a [`JobSender`]; a separately spawned
//! [`AiDispatchWorker`] consumes jobs, calls the completion or image API,
//! and appends the reply to the conversation as the AI sentinel sender.
//!
//! ## Modules
//!
//! - [`job`] – AiJob descriptor
//! - [`queue`] – unbounded mpsc channel wrappers
//! - [`clients`] – ChatCompletion / ImageGeneration traits and OpenAI-backed impls
//! - [`worker`] – the dispatch loop and fallback policy

mod clients;
mod job;
mod queue;
mod worker;

pub use clients::{ChatCompletion, ImageGeneration, OpenAiChatCompletion, OpenAiImageGeneration};
pub use job::AiJob;
pub use queue::{job_channel, JobReceiver, JobSender};
pub use worker::{
    AiDispatchWorker, IMAGE_FALLBACK_PATH, NO_RESPONSE_FALLBACK, REQUEST_FAILED_FALLBACK,
};
