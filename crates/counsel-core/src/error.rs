//! Error types for counsel

use thiserror::Error;

/// Result type alias using CounselError
pub type Result<T> = std::result::Result<T, CounselError>;

/// Error type alias for convenience
pub type Error = CounselError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for counsel
#[derive(Debug, Error)]
pub enum CounselError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient credit for owner {owner_id}: needed {needed}, available {available}")]
    InsufficientCredit {
        owner_id: i64,
        needed: i64,
        available: i64,
    },

    #[error("Invalid credit amount: {0} (must be a positive integer)")]
    InvalidAmount(i64),

    #[error("Account not found: {0}")]
    AccountNotFound(i64),

    #[error("Expert not found: {0}")]
    ExpertNotFound(i64),

    #[error("Query not found: {0}")]
    QueryNotFound(i64),

    #[error("Content not found: {0}")]
    ContentNotFound(i64),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CounselError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AccountNotFound(_)
            | Self::ExpertNotFound(_)
            | Self::QueryNotFound(_)
            | Self::ContentNotFound(_) => exit_codes::NOT_FOUND,
            Self::InvalidInput(_)
            | Self::InvalidAmount(_)
            | Self::InsufficientCredit { .. }
            | Self::Config(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
