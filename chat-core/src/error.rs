use thiserror::Error;

/// Errors surfaced by chat operations.
///
/// `Unauthenticated`, `Forbidden`, `NotFound`, and `AlreadyExists` abort the
/// originating operation with no partial effect and map onto HTTP statuses at
/// the server boundary. `Database` and `ObjectStore` wrap infrastructure
/// failures as strings so callers stay decoupled from the backend crates.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid request: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Object store error: {0}")]
    ObjectStore(String),
}

impl ChatError {
    /// Wraps any displayable storage failure as `Database`.
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }

    /// Wraps any displayable object-store failure as `ObjectStore`.
    pub fn object_store(err: impl std::fmt::Display) -> Self {
        Self::ObjectStore(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
