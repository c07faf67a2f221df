//! Conversation repository: persistence and queries for conversations.
//!
//! Participants are serialized as a JSON array into a TEXT column; the row
//! shape stays private and decodes back into ConversationRecord on read.

use crate::error::StorageError;
use crate::models::ConversationRecord;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::info;

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: String,
    participants: String,
    is_group: bool,
    group_name: Option<String>,
    group_image: Option<String>,
    admin: Option<String>,
}

impl TryFrom<ConversationRow> for ConversationRecord {
    type Error = StorageError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        let participants: Vec<String> = serde_json::from_str(&row.participants)
            .map_err(|e| StorageError::Decode(format!("participants of {}: {}", row.id, e)))?;
        Ok(ConversationRecord {
            id: row.id,
            participants,
            is_group: row.is_group,
            group_name: row.group_name,
            group_image: row.group_image,
            admin: row.admin,
        })
    }
}

#[derive(Clone)]
pub struct ConversationRepository {
    pool_manager: SqlitePoolManager,
}

impl ConversationRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                participants TEXT NOT NULL,
                is_group INTEGER NOT NULL,
                group_name TEXT,
                group_image TEXT,
                admin TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn insert(&self, conversation: &ConversationRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();
        let participants = serde_json::to_string(&conversation.participants)
            .map_err(|e| StorageError::Decode(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, participants, is_group, group_name, group_image, admin)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&conversation.id)
        .bind(&participants)
        .bind(conversation.is_group)
        .bind(&conversation.group_name)
        .bind(&conversation.group_image)
        .bind(&conversation.admin)
        .execute(pool)
        .await?;

        info!(conversation_id = %conversation.id, "Saved conversation");
        Ok(())
    }

    pub async fn find_by_id(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let row = sqlx::query_as::<_, ConversationRow>("SELECT * FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .fetch_optional(pool)
            .await?;

        row.map(ConversationRecord::try_from).transpose()
    }

    /// Deletes the conversation row; returns false when it was already gone.
    pub async fn delete(&self, conversation_id: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
