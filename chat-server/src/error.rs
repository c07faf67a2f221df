//! HTTP error mapping.
//!
//! Chat errors carry their human-readable message through to the JSON body;
//! infrastructure failures are logged and reported as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chat_core::ChatError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Chat(chat) => match chat {
                ChatError::Unauthenticated => (StatusCode::UNAUTHORIZED, chat.to_string()),
                ChatError::Forbidden(_) => (StatusCode::FORBIDDEN, chat.to_string()),
                ChatError::NotFound(_) => (StatusCode::NOT_FOUND, chat.to_string()),
                ChatError::AlreadyExists(_) => (StatusCode::CONFLICT, chat.to_string()),
                ChatError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, chat.to_string()),
                ChatError::Database(detail) | ChatError::ObjectStore(detail) => {
                    error!(error = %detail, "Infrastructure failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Internal(detail) => {
                error!(error = %detail, "Internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServerError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn chat_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(ChatError::Unauthenticated.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ChatError::Forbidden("nope".into()).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ChatError::NotFound("user".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ChatError::AlreadyExists("email".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ChatError::InvalidArgument("bad".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ChatError::Database("boom".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
