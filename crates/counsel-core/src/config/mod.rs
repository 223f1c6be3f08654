//! Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration
    #[serde(default)]
    pub llm_service: LlmServiceConfig,

    /// Credit bookkeeping configuration
    #[serde(default)]
    pub credits: CreditConfig,

    /// Similarity search configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// LLM service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmServiceConfig {
    /// Base URL of the LLM service for chat/completions
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensions
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// Model name for audio/video transcription
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LlmServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("COUNSEL_LLM_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: default_chat_model(),
            embedding_url: std::env::var("COUNSEL_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: std::env::var("COUNSEL_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_embedding_dimensions),
            transcription_model: default_transcription_model(),
            api_key: std::env::var("COUNSEL_LLM_API_KEY").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("COUNSEL_LLM_MODEL").unwrap_or_else(|_| "gpt-4".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("COUNSEL_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "text-embedding-3-small".to_string())
}

fn default_embedding_dimensions() -> usize {
    1536
}

fn default_transcription_model() -> String {
    std::env::var("COUNSEL_TRANSCRIPTION_MODEL").unwrap_or_else(|_| "whisper-1".to_string())
}

fn default_timeout() -> u64 {
    30
}

/// Credit bookkeeping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditConfig {
    /// Credits debited from a client account per answered query
    #[serde(default = "default_query_cost")]
    pub query_cost: i64,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            query_cost: default_query_cost(),
        }
    }
}

fn default_query_cost() -> i64 {
    1
}

/// Similarity search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum cosine similarity for a match (0.0 - 1.0)
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,

    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            default_limit: default_limit(),
        }
    }
}

fn default_threshold() -> f32 {
    0.7
}

fn default_limit() -> usize {
    10
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}
