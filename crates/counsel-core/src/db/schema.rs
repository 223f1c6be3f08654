//! Database schema and initialization

use crate::error::Result;
use rusqlite::{params, Connection};
use std::path::Path;

/// Main database handle
pub struct Database {
    pub(crate) conn: Connection,
}

const SCHEMA_VERSION: i32 = 1;

const CREATE_TABLES: &str = r#"
-- Requester accounts: one row per user, credit balance lives here.
-- Experts and admins carry a balance of 0 and never get debited.
CREATE TABLE IF NOT EXISTS accounts (
    owner_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    role TEXT NOT NULL CHECK(role IN ('client', 'expert', 'admin')),
    balance INTEGER NOT NULL DEFAULT 0 CHECK(balance >= 0),
    created_at TEXT NOT NULL
);

-- Subject-matter experts
CREATE TABLE IF NOT EXISTS experts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    display_name TEXT NOT NULL,
    subjects TEXT NOT NULL DEFAULT '[]',
    bio TEXT,
    created_at TEXT NOT NULL
);

-- Answered queries (immutable after insert, except late-arriving embedding)
CREATE TABLE IF NOT EXISTS queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    requester_id INTEGER NOT NULL REFERENCES accounts(owner_id),
    expert_id INTEGER NOT NULL REFERENCES experts(id),
    subject TEXT NOT NULL,
    question TEXT NOT NULL,
    response TEXT NOT NULL,
    sources TEXT NOT NULL DEFAULT '[]',
    credits_spent INTEGER NOT NULL DEFAULT 0 CHECK(credits_spent >= 0),
    degraded INTEGER NOT NULL DEFAULT 0,
    failure_reason TEXT,
    created_at TEXT NOT NULL
);

-- One embedding per query, deleted with its owning query
CREATE TABLE IF NOT EXISTS query_embeddings (
    query_id INTEGER PRIMARY KEY REFERENCES queries(id) ON DELETE CASCADE,
    subject TEXT NOT NULL,
    embedding BLOB NOT NULL,
    model TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Uploaded expert content (content-addressable by SHA-256 hash)
CREATE TABLE IF NOT EXISTS contents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    expert_id INTEGER NOT NULL REFERENCES experts(id),
    subject TEXT NOT NULL,
    media_kind TEXT NOT NULL CHECK(media_kind IN ('document', 'audio', 'video', 'presentation')),
    file_name TEXT NOT NULL,
    hash TEXT NOT NULL,
    size INTEGER NOT NULL,
    transcription TEXT,
    has_transcription INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Credit reservations, kept so refunds are idempotent per receipt
CREATE TABLE IF NOT EXISTS credit_receipts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES accounts(owner_id),
    amount INTEGER NOT NULL CHECK(amount > 0),
    refunded INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_queries_requester ON queries(requester_id);
CREATE INDEX IF NOT EXISTS idx_queries_expert ON queries(expert_id);
CREATE INDEX IF NOT EXISTS idx_queries_subject ON queries(subject);
CREATE INDEX IF NOT EXISTS idx_contents_expert ON contents(expert_id);
CREATE INDEX IF NOT EXISTS idx_contents_subject ON contents(subject);
CREATE INDEX IF NOT EXISTS idx_receipts_owner ON credit_receipts(owner_id);
"#;

impl Database {
    /// Open database at path, creating if necessary
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Initialize database schema
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        self.conn.execute_batch(CREATE_TABLES)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    /// Get the stored schema version
    pub fn schema_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;
        Ok(version)
    }
}
