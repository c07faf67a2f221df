//! # Image generation client
//!
//! Thin wrapper around [async-openai] for DALL-E image generation. Every
//! request asks for exactly one square 1024x1024 image returned as a URL;
//! the dispatch worker substitutes its own fallback when no URL comes back.

use async_openai::{
    config::OpenAIConfig,
    types::{CreateImageRequestArgs, Image, ImageModel, ImageResponseFormat, ImageSize},
    Client,
};
use std::sync::Arc;
use tracing;

/// DALL-E image generation client. Wraps async-openai; optionally holds the
/// API key for masked logging.
#[derive(Clone)]
pub struct ImageGenerationClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    api_key_for_logging: Option<String>,
}

impl ImageGenerationClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);
        Self {
            client: Arc::new(client),
            model: "dall-e-3".to_string(),
            api_key_for_logging,
        }
    }

    /// Builds a client with a custom base URL (e.g. for proxies or compatible endpoints).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        let client = Client::with_config(config);
        Self {
            client: Arc::new(client),
            model: "dall-e-3".to_string(),
            api_key_for_logging,
        }
    }

    /// Overrides the model (dall-e-2 or dall-e-3).
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Generates one 1024x1024 image for the prompt.
    ///
    /// Returns the image URL, or `Ok(None)` when the response carries no URL
    /// so the caller can substitute its own fallback; errors only on the call
    /// itself failing.
    #[tracing::instrument(skip(self, prompt))]
    pub async fn generate_image(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        let masked = self
            .api_key_for_logging
            .as_deref()
            .map(mask_key)
            .unwrap_or_else(|| "***".to_string());

        tracing::info!(
            model = %self.model,
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            api_key = %masked,
            "OpenAI image generation request"
        );

        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(ImageModel::Other(self.model.clone()))
            .size(ImageSize::S1024x1024)
            .response_format(ImageResponseFormat::Url)
            .n(1)
            .build()?;

        let response = self.client.images().create(request).await?;

        match response.data.first().and_then(|d| match d.as_ref() {
            Image::Url { url, .. } => Some(url.clone()),
            Image::B64Json { .. } => None,
        }) {
            Some(url) => {
                tracing::info!(image_url = %url, "OpenAI image generation completed");
                Ok(Some(url))
            }
            None => {
                tracing::warn!("OpenAI image generation returned no URL");
                Ok(None)
            }
        }
    }
}

/// Masks an API key for logging: first 7 chars + "***" + last 4 chars;
/// anything of length <= 11 becomes "***" outright.
fn mask_key(key: &str) -> String {
    let len = key.len();
    if len <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &key[..7], &key[len - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_key_hides_middle() {
        assert_eq!(mask_key("sk-short"), "***");
        assert_eq!(mask_key("sk-proj-abcdefghijklmnop"), "sk-proj***mnop");
    }

    #[tokio::test]
    #[ignore] // needs a real API key
    async fn generate_image_against_live_api() {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap();
        let client = ImageGenerationClient::new(api_key);
        let url = client
            .generate_image("a cute cat playing with a ball")
            .await
            .unwrap();
        assert!(url.is_some());
    }
}
