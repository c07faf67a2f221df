//! Context window assembly for chat-completion jobs.
//!
//! Bounding the window to a small fixed number of recent turns caps latency
//! and API cost while keeping enough history for coherent replies. Nothing
//! is persisted or cached across calls.

use chat_core::AI_SENDER;
use prompt::ChatMessage;
use storage::{MessageRepository, StorageError};

/// How many prior messages go into a window (the triggering message is
/// appended on top of these).
pub const CONTEXT_WINDOW_SIZE: i64 = 5;

/// Builds the window for one dispatch: the most recent prior messages of the
/// conversation in chronological ascending order, the triggering text last.
///
/// The just-stored triggering message is excluded from the history fetch so
/// it appears exactly once, as the final entry. Sentinel-authored messages
/// map to the assistant role, everything else to the user role. Output length
/// is `min(CONTEXT_WINDOW_SIZE, prior messages) + 1`.
pub async fn build_context_window(
    messages: &MessageRepository,
    conversation_id: &str,
    exclude_message_id: &str,
    new_content: &str,
) -> Result<Vec<ChatMessage>, StorageError> {
    let mut recent = messages
        .recent_excluding(conversation_id, exclude_message_id, CONTEXT_WINDOW_SIZE)
        .await?;
    // Newest-first from the store; the API wants oldest-first.
    recent.reverse();

    let mut context: Vec<ChatMessage> = recent
        .into_iter()
        .map(|record| {
            if record.sender == AI_SENDER {
                ChatMessage::assistant(record.content)
            } else {
                ChatMessage::user(record.content)
            }
        })
        .collect();
    context.push(ChatMessage::user(new_content));

    Ok(context)
}
