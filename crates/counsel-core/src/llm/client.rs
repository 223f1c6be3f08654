//! HTTP client for external inference services (OpenAI-compatible)

use crate::config::LlmServiceConfig;
use crate::error::{CounselError, Result};
use crate::llm::{ChatMessage, LlmClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// API metrics for monitoring
#[derive(Debug, Default)]
pub struct ApiMetrics {
    pub total_requests: AtomicU64,
    pub total_errors: AtomicU64,
    pub total_latency_ms: AtomicU64,
}

/// Snapshot of API metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
    pub avg_latency_ms: f64,
}

/// OpenAI-compatible client for chat, embeddings and transcription
pub struct OpenAiClient {
    http_client: reqwest::Client,
    config: LlmServiceConfig,
    metrics: Arc<ApiMetrics>,
}

impl OpenAiClient {
    /// Create new client from configuration
    pub fn new(config: LlmServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(CounselError::Http)?;

        Ok(Self {
            http_client,
            config,
            metrics: Arc::new(ApiMetrics::default()),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(LlmServiceConfig::default())
    }

    /// Get current API metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        let total = self.metrics.total_requests.load(Ordering::Relaxed);
        MetricsSnapshot {
            total_requests: total,
            total_errors: self.metrics.total_errors.load(Ordering::Relaxed),
            avg_latency_ms: if total > 0 {
                self.metrics.total_latency_ms.load(Ordering::Relaxed) as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    fn track_error(&self) {
        self.metrics.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn track_latency(&self, start: Instant) {
        let elapsed = start.elapsed().as_millis() as u64;
        self.metrics
            .total_latency_ms
            .fetch_add(elapsed, Ordering::Relaxed);
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            req.header("Authorization", format!("Bearer {}", api_key))
        } else {
            req
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: 0.7,
            max_tokens: 1000,
        };

        let url = format!("{}/v1/chat/completions", self.config.url);
        let req = self.authorize(self.http_client.post(&url).json(&request));

        let response = req.send().await.map_err(|e| {
            self.track_error();
            CounselError::Generation(format!("chat request failed: {}", e))
        })?;

        if !response.status().is_success() {
            self.track_error();
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CounselError::Generation(format!(
                "chat service error (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            self.track_error();
            CounselError::Generation(format!("malformed chat payload: {}", e))
        })?;

        let content = chat_response
            .choices
            .first()
            .ok_or_else(|| {
                self.track_error();
                CounselError::Generation("no choices in chat response".to_string())
            })?
            .message
            .content
            .clone();

        self.track_latency(start);
        Ok(content)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| CounselError::Embedding("no embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        #[derive(Serialize)]
        struct EmbedRequest {
            model: String,
            input: Vec<String>,
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            data: Vec<EmbedData>,
        }

        #[derive(Deserialize)]
        struct EmbedData {
            embedding: Vec<f32>,
        }

        let request = EmbedRequest {
            model: self.config.embedding_model.clone(),
            input: texts.to_vec(),
        };

        let url = format!("{}/v1/embeddings", self.config.embeddings_url());
        let req = self.authorize(self.http_client.post(&url).json(&request));

        let response = req.send().await.map_err(|e| {
            self.track_error();
            CounselError::Embedding(format!("embedding request failed: {}", e))
        })?;

        if !response.status().is_success() {
            self.track_error();
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CounselError::Embedding(format!(
                "embedding service error (HTTP {}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            self.track_error();
            CounselError::Embedding(format!("malformed embedding payload: {}", e))
        })?;

        if embed_response.data.len() != texts.len() {
            self.track_error();
            return Err(CounselError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embed_response.data.len()
            )));
        }

        self.track_latency(start);
        Ok(embed_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }

    async fn transcribe(&self, file_name: &str, media: Vec<u8>) -> Result<String> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        #[derive(Deserialize)]
        struct TranscriptionResponse {
            text: String,
        }

        let part = reqwest::multipart::Part::bytes(media).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.transcription_model.clone())
            .part("file", part);

        let url = format!("{}/v1/audio/transcriptions", self.config.url);
        let req = self.authorize(self.http_client.post(&url).multipart(form));

        let response = req.send().await.map_err(|e| {
            self.track_error();
            CounselError::Transcription(format!("transcription request failed: {}", e))
        })?;

        if !response.status().is_success() {
            self.track_error();
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CounselError::Transcription(format!(
                "transcription service error (HTTP {}): {}",
                status, body
            )));
        }

        let transcription: TranscriptionResponse = response.json().await.map_err(|e| {
            self.track_error();
            CounselError::Transcription(format!("malformed transcription payload: {}", e))
        })?;

        self.track_latency(start);
        Ok(transcription.text)
    }

    fn embedding_dimensions(&self) -> usize {
        self.config.embedding_dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
