//! Filesystem-backed object store for uploaded media.
//!
//! Objects are stored under a flat directory keyed by uuid; ids are parsed
//! back into uuids on every lookup, which also rejects path traversal. The
//! public URL points at this server's own `/objects/{id}` route.

use std::path::PathBuf;

use async_trait::async_trait;
use chat_core::ChatError;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServerError;

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: usize,
}

impl FsObjectStore {
    pub async fn new(
        base_path: PathBuf,
        public_base_url: String,
        max_size: usize,
    ) -> Result<Self, ServerError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            ServerError::Internal(format!(
                "Failed to create object directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Object store initialized");

        Ok(Self {
            base_path,
            public_base_url,
            max_size,
        })
    }

    /// Stores uploaded bytes and returns the new object id.
    pub async fn store(&self, data: &[u8]) -> Result<String, ServerError> {
        if data.is_empty() {
            return Err(ServerError::BadRequest("Empty upload".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ServerError::BadRequest(format!(
                "Upload too large: {} bytes (max {})",
                data.len(),
                self.max_size
            )));
        }

        let id = Uuid::new_v4();
        let path = self.base_path.join(id.to_string());
        fs::write(&path, data).await.map_err(|e| {
            ServerError::Internal(format!("Failed to write object {}: {}", id, e))
        })?;

        debug!(id = %id, size = data.len(), "Stored object");
        Ok(id.to_string())
    }

    /// Reads an object's bytes for serving.
    pub async fn read(&self, object_id: &str) -> Result<Vec<u8>, ServerError> {
        let path = self.object_path(object_id)?;
        if !path.exists() {
            return Err(ServerError::Chat(ChatError::NotFound(format!(
                "object {}",
                object_id
            ))));
        }

        fs::read(&path).await.map_err(|e| {
            ServerError::Internal(format!("Failed to read object {}: {}", object_id, e))
        })
    }

    /// Resolves the on-disk path; parsing the id as a uuid rejects anything
    /// that could escape the base directory.
    fn object_path(&self, object_id: &str) -> Result<PathBuf, ServerError> {
        let id = Uuid::parse_str(object_id).map_err(|_| {
            ServerError::BadRequest(format!("Invalid object id: {}", object_id))
        })?;
        Ok(self.base_path.join(id.to_string()))
    }
}

#[async_trait]
impl chat_service::ObjectStore for FsObjectStore {
    async fn public_url(&self, object_id: &str) -> chat_core::Result<String> {
        let path = self
            .object_path(object_id)
            .map_err(|e| ChatError::object_store(e))?;
        if !path.exists() {
            return Err(ChatError::NotFound(format!("object {}", object_id)));
        }
        Ok(format!("{}/objects/{}", self.public_base_url, object_id))
    }
}
