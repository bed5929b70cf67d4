use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{CreatorError, CreatorResult};

pub mod openai;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    OpenAI,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = CreatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            _ => Err(CreatorError::invalid_input(format!("Unknown provider: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system<T: Into<String>>(content: T) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user<T: Into<String>>(content: T) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant<T: Into<String>>(content: T) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub provider: Provider,
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat-completion backend shared by the design synthesizer and the gateway.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn chat_completion(&self, request: &ChatRequest) -> CreatorResult<ChatResponse>;
    async fn health_check(&self) -> CreatorResult<bool>;
    fn get_provider(&self) -> Provider;
    fn get_default_model(&self) -> &str;
}

/// Build the configured backend.
pub fn build_provider(config: &LlmConfig) -> CreatorResult<Arc<dyn ProviderClient>> {
    let provider: Provider = config.provider.parse()?;
    debug!("Initializing provider: {}", provider);

    match provider {
        Provider::OpenAI => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| CreatorError::config("OPENAI_API_KEY is not set"))?;
            let mut client = openai::OpenAIClient::with_api_key(api_key);
            if let Some(base_url) = &config.base_url {
                client = client.with_base_url(base_url.clone());
            }
            Ok(Arc::new(client))
        }
    }
}
