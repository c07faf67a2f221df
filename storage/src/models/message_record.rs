//! Message record model for persistence.
//!
//! Maps to the `messages` table and is used by MessageRepository. Records are
//! append-only; `created_at` is assigned here at construction time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    pub conversation_id: String,
    /// User id, or the AI sender sentinel for assistant messages.
    pub sender: String,
    /// Plain text, or a resolved URL for image/video/file kinds.
    pub content: String,
    pub kind: String,
    /// Only set for `file` kind.
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Creates a new record with a generated UUID and current timestamp.
    pub fn new(
        conversation_id: String,
        sender: String,
        content: String,
        kind: String,
        file_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id,
            sender,
            content,
            kind,
            file_name,
            created_at: Utc::now(),
        }
    }
}
