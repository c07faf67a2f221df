//! Chat server binary: wires configuration, storage, the AI clients, the
//! dispatch worker, and the HTTP API together.

mod api;
mod config;
mod error;
mod object_store;

use std::sync::Arc;

use ai_dispatch::{job_channel, AiDispatchWorker, OpenAiChatCompletion, OpenAiImageGeneration};
use chat_service::ChatService;
use image_generation_client::ImageGenerationClient;
use openai_client::OpenAIClient;
use storage::{ConversationRepository, MessageRepository, SqlitePoolManager, UserRepository};
use tracing::info;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::object_store::FsObjectStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    chat_core::init_tracing(&config.log_file_path)?;
    info!(addr = %config.http_addr, model = %config.model, "Starting chat server");

    let pool = SqlitePoolManager::new(&config.database_url).await?;
    let users = UserRepository::new(pool.clone()).await?;
    let conversations = ConversationRepository::new(pool.clone()).await?;
    let messages = MessageRepository::new(pool).await?;

    let chat_client = match &config.openai_base_url {
        Some(base) => OpenAIClient::with_base_url(config.openai_api_key.clone(), base.clone()),
        None => OpenAIClient::new(config.openai_api_key.clone()),
    };
    let image_client = match &config.openai_base_url {
        Some(base) => {
            ImageGenerationClient::with_base_url(config.openai_api_key.clone(), base.clone())
        }
        None => ImageGenerationClient::new(config.openai_api_key.clone()),
    }
    .with_model(config.image_model.clone());

    let (jobs, receiver) = job_channel();
    let worker = AiDispatchWorker::new(
        Arc::new(OpenAiChatCompletion::new(chat_client, config.model.clone())),
        Arc::new(OpenAiImageGeneration::new(image_client)),
        messages.clone(),
        receiver,
        config.system_prompt.clone(),
    );
    tokio::spawn(worker.run());

    let objects = Arc::new(
        FsObjectStore::new(
            config.object_store_path.clone(),
            config.public_base_url.clone(),
            config.max_upload_size,
        )
        .await?,
    );

    let service = ChatService::new(users, conversations, messages, objects.clone(), jobs);

    let http_addr = config.http_addr;
    let state = AppState {
        service,
        objects,
        config: Arc::new(config),
    };

    api::serve(state, http_addr).await
}
