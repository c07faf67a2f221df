//! User repository: persistence and queries for user records.
//!
//! Uses SqlitePoolManager and the UserRecord model. Lookup by token identifier
//! is the hot path (every authenticated request) and is index-backed.

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::info;

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                image TEXT,
                token_identifier TEXT NOT NULL UNIQUE,
                is_online INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_users_token_identifier ON users(token_identifier)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts a new user. Fails with `AlreadyExists` when the email is taken.
    pub async fn insert(&self, user: &UserRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&user.email)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "email {}",
                user.email
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, image, token_identifier, is_online)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.image)
        .bind(&user.token_identifier)
        .bind(user.is_online)
        .execute(pool)
        .await?;

        info!(user_id = %user.id, "Saved user");
        Ok(())
    }

    pub async fn find_by_token(
        &self,
        token_identifier: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let user =
            sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE token_identifier = ?")
                .bind(token_identifier)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_all(&self) -> Result<Vec<UserRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let users = sqlx::query_as::<_, UserRecord>("SELECT * FROM users")
            .fetch_all(pool)
            .await?;

        Ok(users)
    }

    /// Updates the profile image; returns false when no user matches the token.
    pub async fn set_image(
        &self,
        token_identifier: &str,
        image: &str,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("UPDATE users SET image = ? WHERE token_identifier = ?")
            .bind(image)
            .bind(token_identifier)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the display name; returns false when no user matches the token.
    pub async fn set_name(
        &self,
        token_identifier: &str,
        name: &str,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("UPDATE users SET name = ? WHERE token_identifier = ?")
            .bind(name)
            .bind(token_identifier)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips the presence flag; returns false when no user matches the token.
    pub async fn set_online(
        &self,
        token_identifier: &str,
        is_online: bool,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("UPDATE users SET is_online = ? WHERE token_identifier = ?")
            .bind(is_online)
            .bind(token_identifier)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
