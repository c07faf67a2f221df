//! Seam to the binary object store.
//!
//! Image, video, and file sends store bytes out of band and reference them
//! by object id; the service only needs the id resolved to a publicly
//! fetchable URL before persisting it as message content.

use async_trait::async_trait;
use chat_core::Result;

/// Resolves uploaded object ids to public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// The publicly fetchable URL for a stored object, or `NotFound` when no
    /// such object exists.
    async fn public_url(&self, object_id: &str) -> Result<String>;
}
