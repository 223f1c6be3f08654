//! Counsel Core Library
//!
//! Query orchestration and semantic retrieval for expert consultation:
//!
//! - credit-gated admission control with atomic reservations
//! - response generation through an external chat model, with a fixed
//!   canned-answer fallback that is always flagged as degraded
//! - best-effort embedding of every answered query
//! - cosine-similarity retrieval over past questions
//! - a transcription gate for uploaded audio/video content

pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod ledger;
pub mod llm;
pub mod orchestrator;

pub use config::{Config, CreditConfig, LlmServiceConfig, SearchConfig};
pub use db::{
    Account, Content, Database, EmbeddingRecord, Expert, MediaKind, QueryAnalytics, QueryRecord,
    Role,
};
pub use error::{CounselError, Error, Result};
pub use index::{cosine_similarity, Match, SimilarityIndex};
pub use ledger::{CreditLedger, Receipt};
pub use llm::{
    fallback_answer, ChatMessage, GeneratedAnswer, LlmClient, MetricsSnapshot, OpenAiClient,
    ResponseGenerator,
};
pub use orchestrator::{
    AskResult, QueryOrchestrator, SimilarQuery, StatsSnapshot, TranscriptionGate, UploadOutcome,
};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "counsel";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "counsel";
