//! Message repository: persistence and queries for messages.
//!
//! Uses SqlitePoolManager and the MessageRecord model. The message log is
//! append-only; rows are removed only by `delete_by_conversation`. Listing
//! orders by `created_at` with insertion order (rowid) as tiebreaker.

use crate::error::StorageError;
use crate::models::MessageRecord;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::info;

/// Ordering for message listings, by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ORDER BY created_at ASC, rowid ASC",
            SortOrder::Desc => "ORDER BY created_at DESC, rowid DESC",
        }
    }
}

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                conversation_id TEXT NOT NULL,
                sender TEXT NOT NULL,
                content TEXT NOT NULL,
                kind TEXT NOT NULL,
                file_name TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_conversation_id ON messages(conversation_id)",
        )
        .execute(pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Inserts a new message and returns the stored record (id and timestamp
    /// assigned here). No validation beyond what the caller already did.
    pub async fn append(
        &self,
        conversation_id: &str,
        sender: &str,
        content: &str,
        kind: &str,
        file_name: Option<&str>,
    ) -> Result<MessageRecord, StorageError> {
        let message = MessageRecord::new(
            conversation_id.to_string(),
            sender.to_string(),
            content.to_string(),
            kind.to_string(),
            file_name.map(|s| s.to_string()),
        );

        let pool = self.pool_manager.pool();
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender, content, kind, file_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.conversation_id)
        .bind(&message.sender)
        .bind(&message.content)
        .bind(&message.kind)
        .bind(&message.file_name)
        .bind(message.created_at)
        .execute(pool)
        .await?;

        info!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            kind = %message.kind,
            "Saved message"
        );
        Ok(message)
    }

    /// Lists one conversation's messages in the given order, optionally capped.
    pub async fn list_by_conversation(
        &self,
        conversation_id: &str,
        order: SortOrder,
        limit: Option<i64>,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let mut sql = format!(
            "SELECT * FROM messages WHERE conversation_id = ? {}",
            order.sql()
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let messages = sqlx::query_as::<_, MessageRecord>(&sql)
            .bind(conversation_id)
            .fetch_all(pool)
            .await?;

        Ok(messages)
    }

    /// The `limit` newest messages of a conversation, newest first, skipping
    /// one message by id. Context assembly uses this to window the history
    /// that existed before the triggering message was stored.
    pub async fn recent_excluding(
        &self,
        conversation_id: &str,
        exclude_message_id: &str,
        limit: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let messages = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM messages WHERE conversation_id = ? AND id != ? \
             ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(conversation_id)
        .bind(exclude_message_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Deletes every message of a conversation; returns the number removed.
    pub async fn delete_by_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<u64, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM messages WHERE conversation_id = ?")
            .bind(conversation_id)
            .execute(pool)
            .await?;

        info!(
            conversation_id = %conversation_id,
            deleted = result.rows_affected(),
            "Deleted conversation messages"
        );
        Ok(result.rows_affected())
    }
}
