//! AI provider integrations
//!
//! The chat coordinator only sees [`ChatProvider`]; which inference server
//! sits behind it is decided once at startup from [`LlmConfig`].

mod ollama;
mod openai_compat;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;
use crate::conversation::Message;

pub use ollama::OllamaProvider;
pub use openai_compat::{OpenAICompatConfig, OpenAICompatProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether the endpoint was unreachable, timed out or refused the call,
    /// as opposed to answering with something we could not use
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::RequestFailed(e) => !e.is_decode(),
            ProviderError::Status { .. } => true,
            _ => false,
        }
    }
}

/// Sampling settings sent with every completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// A non-streaming chat completion endpoint
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Send the whole conversation and return the generated assistant message
    async fn chat(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Message, ProviderError>;
}

/// Build the configured provider
pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn ChatProvider>, ProviderError> {
    match config.provider.to_lowercase().as_str() {
        "ollama" => Ok(Arc::new(OllamaProvider::new(
            config.base_url.clone(),
            config.model.clone(),
            config.timeout_secs,
        )?)),
        "openai" | "openrouter" => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| ProviderError::NotConfigured(config.provider.clone()))?;
            let mut compat = if config.provider.eq_ignore_ascii_case("openrouter") {
                OpenAICompatConfig::openrouter(api_key)
            } else {
                OpenAICompatConfig::openai(api_key)
            };
            compat.base_url = config.base_url.clone();
            compat.model = config.model.clone();
            compat.timeout_secs = config.timeout_secs;
            Ok(Arc::new(OpenAICompatProvider::new(compat)?))
        }
        "local" => Ok(Arc::new(OpenAICompatProvider::new(OpenAICompatConfig {
            timeout_secs: config.timeout_secs,
            ..OpenAICompatConfig::local(config.base_url.clone(), config.model.clone())
        })?)),
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}
