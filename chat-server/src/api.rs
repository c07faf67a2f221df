//! HTTP API: routes, handlers, and the per-request authentication boundary.
//!
//! The caller identity is built exactly once per request from the
//! `Authorization` header and passed into the service as a value; handlers
//! hold no other state than [`AppState`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, Method},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use chat_core::{CallerContext, ChatError};
use chat_service::{ChatService, MessageWithSender, NewConversation};
use storage::{ConversationRecord, MessageRecord, UserRecord};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::object_store::FsObjectStore;

#[derive(Clone)]
pub struct AppState {
    pub service: ChatService,
    pub objects: Arc<FsObjectStore>,
    pub config: Arc<ServerConfig>,
}

/// Builds the caller context from the `Authorization` header. Anything other
/// than a non-empty bearer token yields an anonymous context; operations
/// decide for themselves whether that is acceptable.
fn caller_context(headers: &HeaderMap) -> CallerContext {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match auth.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => CallerContext::bearer(token),
        _ => CallerContext::anonymous(),
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/callback", post(auth_callback))
        .route("/me", get(get_me))
        .route("/me/name", patch(update_name))
        .route("/me/image", patch(update_image))
        .route("/presence/offline", post(set_offline))
        .route("/users", get(get_users))
        .route("/conversations", post(create_conversation))
        .route("/conversations/{id}", delete(delete_conversation))
        .route(
            "/conversations/{id}/messages",
            get(get_messages).post(send_message),
        )
        .route("/conversations/{id}/members", get(get_members))
        .route("/conversations/{id}/attachments", post(upload_attachment))
        .route("/objects/{id}", get(get_object))
        .layer(DefaultBodyLimit::max(state.config.max_upload_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
struct AuthCallbackRequest {
    email: String,
    name: String,
    image: Option<String>,
}

#[derive(Deserialize)]
struct SendMessageRequest {
    content: String,
}

#[derive(Deserialize)]
struct UpdateNameRequest {
    name: String,
}

#[derive(Deserialize)]
struct UpdateImageRequest {
    image: String,
}

#[derive(Serialize)]
struct DeleteConversationResponse {
    deleted_messages: u64,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Identity-provider callback: creates the user on first login, or marks a
/// known token online again.
async fn auth_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AuthCallbackRequest>,
) -> Result<Json<UserRecord>, ServerError> {
    let ctx = caller_context(&headers);
    let token = ctx.token.as_deref().ok_or(ChatError::Unauthenticated)?;

    let user = state
        .service
        .login(token, &req.email, &req.name, req.image)
        .await?;
    Ok(Json(user))
}

async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserRecord>, ServerError> {
    let ctx = caller_context(&headers);
    Ok(Json(state.service.get_me(&ctx).await?))
}

async fn get_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserRecord>>, ServerError> {
    let ctx = caller_context(&headers);
    Ok(Json(state.service.get_users(&ctx).await?))
}

async fn update_name(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateNameRequest>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let ctx = caller_context(&headers);
    state.service.update_name(&ctx, &req.name).await?;
    Ok(Json(serde_json::json!({ "updated": true })))
}

async fn update_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateImageRequest>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let ctx = caller_context(&headers);
    state.service.update_profile_image(&ctx, &req.image).await?;
    Ok(Json(serde_json::json!({ "updated": true })))
}

async fn set_offline(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ServerError> {
    let ctx = caller_context(&headers);
    state.service.set_offline(&ctx).await?;
    Ok(Json(serde_json::json!({ "online": false })))
}

async fn create_conversation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewConversation>,
) -> Result<Json<ConversationRecord>, ServerError> {
    let ctx = caller_context(&headers);
    Ok(Json(state.service.create_conversation(&ctx, req).await?))
}

async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<MessageRecord>, ServerError> {
    let ctx = caller_context(&headers);
    let message = state
        .service
        .send_text_message(&ctx, &conversation_id, &req.content)
        .await?;
    Ok(Json(message))
}

async fn get_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<MessageWithSender>>, ServerError> {
    let ctx = caller_context(&headers);
    Ok(Json(state.service.get_messages(&ctx, &conversation_id).await?))
}

async fn get_members(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserRecord>>, ServerError> {
    let ctx = caller_context(&headers);
    Ok(Json(
        state
            .service
            .get_group_members(&ctx, &conversation_id)
            .await?,
    ))
}

async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeleteConversationResponse>, ServerError> {
    let ctx = caller_context(&headers);
    let deleted_messages = state
        .service
        .delete_conversation(&ctx, &conversation_id)
        .await?;
    Ok(Json(DeleteConversationResponse { deleted_messages }))
}

/// Uploads one attachment and sends it as a message in one step. Multipart
/// fields: `kind` (`image`/`video`/`file`) and `file` (the bytes; its
/// filename is kept for `file` sends).
async fn upload_attachment(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<MessageRecord>, ServerError> {
    let ctx = caller_context(&headers);

    let mut kind: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "kind" => {
                kind = Some(field.text().await.map_err(|e| {
                    ServerError::BadRequest(format!("Failed to read 'kind' field: {}", e))
                })?);
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                data = Some(field.bytes().await.map_err(|e| {
                    ServerError::BadRequest(format!("Failed to read 'file' field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| ServerError::BadRequest("Missing 'kind' field".to_string()))?;
    let data = data.ok_or_else(|| ServerError::BadRequest("Missing 'file' field".to_string()))?;

    let object_id = state.objects.store(&data).await?;
    info!(
        conversation_id = %conversation_id,
        object_id = %object_id,
        kind = %kind,
        size = data.len(),
        "Attachment uploaded"
    );

    let message = match kind.as_str() {
        "image" => {
            state
                .service
                .send_image(&ctx, &conversation_id, &object_id)
                .await?
        }
        "video" => {
            state
                .service
                .send_video(&ctx, &conversation_id, &object_id)
                .await?
        }
        "file" => {
            let name = file_name.unwrap_or_else(|| "file".to_string());
            state
                .service
                .send_file(&ctx, &conversation_id, &object_id, &name)
                .await?
        }
        other => {
            return Err(ServerError::BadRequest(format!(
                "Unsupported attachment kind: {}",
                other
            )))
        }
    };
    Ok(Json(message))
}

/// Serves stored object bytes; this is the target of every public URL the
/// object store hands out.
async fn get_object(
    State(state): State<AppState>,
    Path(object_id): Path<String>,
) -> Result<Vec<u8>, ServerError> {
    state.objects.read(&object_id).await
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
