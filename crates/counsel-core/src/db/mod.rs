//! Database layer for counsel
//!
//! SQLite-backed record store holding accounts, experts, answered queries,
//! their embeddings, uploaded content, and credit receipts.

mod accounts;
mod contents;
mod experts;
mod queries;
mod schema;
pub mod vectors;

pub use accounts::{Account, Role};
pub use contents::{Content, MediaKind};
pub use experts::Expert;
pub use queries::{QueryAnalytics, QueryInsert, QueryRecord};
pub use schema::Database;
pub use vectors::EmbeddingRecord;

use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("counsel.sqlite")
    }
}
