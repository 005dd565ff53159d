//! Application configuration

pub mod prompts;

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use prompts::{PersonaPrompt, PromptError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Origin of the portfolio frontend, allowed by CORS
    pub frontend_url: String,
    pub llm: LlmConfig,
    /// SQLite file holding chat history
    pub history_db: PathBuf,
    /// JSON knowledge base the assistant answers from
    pub resume_path: PathBuf,
    /// Optional TOML file overriding the built-in persona
    pub persona_path: Option<PathBuf>,
}

/// Inference endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "ollama", "openrouter", "openai", "local"
    pub provider: String,
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

const DEFAULT_TIMEOUT_SECS: u64 = 120;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match var("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a number, got {:?}", p)))?,
            None => 8000,
        };

        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port,
            frontend_url: var("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".into()),
            llm: LlmConfig::from_lookup(&var)?,
            history_db: var("HISTORY_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("chat_history.db")),
            resume_path: var("RESUME_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("resume_knowledge.json")),
            persona_path: var("PERSONA_PATH").map(PathBuf::from),
        })
    }
}

impl LlmConfig {
    fn from_lookup<F>(var: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = var("LLM_PROVIDER")
            .unwrap_or_else(|| "ollama".into())
            .to_lowercase();

        let timeout_secs = match var("LLM_TIMEOUT_SECS") {
            Some(t) => t.parse().map_err(|_| {
                ConfigError::Invalid(format!("LLM_TIMEOUT_SECS must be a number, got {:?}", t))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let (base_url, model, api_key) = match provider.as_str() {
            "ollama" => (
                var("OLLAMA_URL").unwrap_or_else(|| "http://localhost:11434".into()),
                var("OLLAMA_MODEL").unwrap_or_else(|| "gemma2:2b".into()),
                None,
            ),
            "openrouter" => (
                var("OPENAI_BASE_URL").unwrap_or_else(|| "https://openrouter.ai/api/v1".into()),
                "google/gemma-7b-it:free".to_string(),
                var("OPENROUTER_API_KEY").or_else(|| var("OPENAI_API_KEY")),
            ),
            "openai" => (
                var("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com/v1".into()),
                "gpt-4o-mini".to_string(),
                var("OPENAI_API_KEY"),
            ),
            "local" => (
                var("OPENAI_BASE_URL").unwrap_or_else(|| "http://localhost:8000/v1".into()),
                "local-model".to_string(),
                None,
            ),
            other => return Err(ConfigError::Invalid(format!("unknown LLM_PROVIDER {:?}", other))),
        };

        Ok(Self {
            provider,
            base_url,
            model: var("LLM_MODEL").unwrap_or(model),
            api_key,
            timeout_secs,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.frontend_url, "http://localhost:5173");
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.llm.model, "gemma2:2b");
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.resume_path, PathBuf::from("./data/resume_knowledge.json"));
        assert!(config.persona_path.is_none());
    }

    #[test]
    fn test_openrouter() {
        let config = config_from(&[
            ("LLM_PROVIDER", "OpenRouter"),
            ("OPENROUTER_API_KEY", "sk-or"),
            ("LLM_MODEL", "meta-llama/llama-3-8b-instruct"),
        ])
        .unwrap();

        assert_eq!(config.llm.provider, "openrouter");
        assert!(config.llm.base_url.contains("openrouter.ai"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-or"));
        assert_eq!(config.llm.model, "meta-llama/llama-3-8b-instruct");
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("LLM_PROVIDER", "bard")]).is_err());
        assert!(config_from(&[("LLM_TIMEOUT_SECS", "soon")]).is_err());
    }
}
