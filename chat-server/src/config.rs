//! Server configuration loaded from environment variables.
//!
//! `OPENAI_API_KEY` is the only required key; everything else defaults so the
//! server can start with a single variable set for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use std::env;

/// Runtime configuration for the chat server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`, default `0.0.0.0:8080`.
    pub http_addr: SocketAddr,

    /// SQLite database file path.
    /// Env: `DATABASE_URL`, default `./chat.db`.
    pub database_url: String,

    /// Directory for uploaded objects.
    /// Env: `OBJECT_STORE_PATH`, default `./objects`.
    pub object_store_path: PathBuf,

    /// Base URL under which `/objects/{id}` is publicly reachable.
    /// Env: `PUBLIC_BASE_URL`, default `http://localhost:8080`.
    pub public_base_url: String,

    /// OpenAI API key. Env: `OPENAI_API_KEY`, required.
    pub openai_api_key: String,

    /// Custom OpenAI-compatible base URL. Env: `OPENAI_BASE_URL`, optional.
    pub openai_base_url: Option<String>,

    /// Chat-completion model. Env: `MODEL`, default `gpt-4o`.
    pub model: String,

    /// Image-generation model. Env: `IMAGE_MODEL`, default `dall-e-3`.
    pub image_model: String,

    /// System instruction sent ahead of every context window.
    /// Env: `SYSTEM_PROMPT`, defaults to the built-in prompt.
    pub system_prompt: String,

    /// Append-only log file. Env: `LOG_FILE`, default `chat-server.log`.
    pub log_file_path: String,

    /// Maximum upload size in bytes (25 MiB).
    pub max_upload_size: usize,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let http_addr = env::var("HTTP_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .context("Invalid HTTP_ADDR")?;
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "./chat.db".to_string());
        let object_store_path = PathBuf::from(
            env::var("OBJECT_STORE_PATH").unwrap_or_else(|_| "./objects".to_string()),
        );
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let model = env::var("MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let image_model = env::var("IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string());
        let system_prompt = env::var("SYSTEM_PROMPT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| prompt::DEFAULT_SYSTEM_MESSAGE.to_string());
        let log_file_path =
            env::var("LOG_FILE").unwrap_or_else(|_| "chat-server.log".to_string());

        Ok(Self {
            http_addr,
            database_url,
            object_store_path,
            public_base_url,
            openai_api_key,
            openai_base_url,
            model,
            image_model,
            system_prompt,
            log_file_path,
            max_upload_size: 25 * 1024 * 1024,
        })
    }
}
