//! Conversation record model for persistence.
//!
//! Maps to the `conversations` table. Participants are stored as a JSON array
//! of user ids in a TEXT column; ConversationRepository handles the encoding.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    /// Ordered list of participant user ids.
    pub participants: Vec<String>,
    pub is_group: bool,
    pub group_name: Option<String>,
    pub group_image: Option<String>,
    /// Group admin's user id; only meaningful for group conversations.
    pub admin: Option<String>,
}

impl ConversationRecord {
    /// Creates a new record with a generated UUID.
    pub fn new(
        participants: Vec<String>,
        is_group: bool,
        group_name: Option<String>,
        group_image: Option<String>,
        admin: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            participants,
            is_group,
            group_name,
            group_image,
            admin,
        }
    }

    /// True if the given user id is listed as a participant.
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}
