//! LLM integration
//!
//! Provides the trait seam and HTTP implementations for the external
//! inference endpoints:
//! - chat completion (response generation)
//! - embeddings (similarity indexing and lookup)
//! - audio/video transcription

mod client;
mod fallback;
mod generator;
mod traits;

pub use client::{ApiMetrics, MetricsSnapshot, OpenAiClient};
pub use fallback::{fallback_answer, FALLBACK_SOURCE};
pub use generator::{build_system_prompt, GeneratedAnswer, ResponseGenerator, SOURCE_LABELS};
pub use traits::{ChatMessage, LlmClient};
