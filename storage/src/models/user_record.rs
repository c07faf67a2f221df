//! User record model for persistence.
//!
//! Maps to the `users` table and is used by UserRepository.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    /// Opaque subject identifier from the identity provider; unique per user.
    pub token_identifier: String,
    pub is_online: bool,
}

impl UserRecord {
    /// Creates a new record with a generated UUID; new users start online.
    pub fn new(
        token_identifier: String,
        email: String,
        name: String,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            image,
            token_identifier,
            is_online: true,
        }
    }
}
