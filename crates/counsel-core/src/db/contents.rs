//! Uploaded content operations

use super::Database;
use crate::error::{CounselError, Result};
use chrono::Utc;
use rusqlite::params;
use std::fmt;
use std::str::FromStr;

/// Declared media type of an uploaded asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Document,
    Audio,
    Video,
    Presentation,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Presentation => "presentation",
        }
    }

    /// Spoken media must pass through transcription before it is complete
    pub fn requires_transcription(&self) -> bool {
        matches!(self, MediaKind::Audio | MediaKind::Video)
    }
}

impl FromStr for MediaKind {
    type Err = CounselError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "document" => Ok(MediaKind::Document),
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            "presentation" => Ok(MediaKind::Presentation),
            other => Err(CounselError::InvalidInput(format!(
                "unknown media kind: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content record from database
#[derive(Debug, Clone)]
pub struct Content {
    pub id: i64,
    pub expert_id: i64,
    pub subject: String,
    pub media_kind: MediaKind,
    pub file_name: String,
    pub hash: String,
    pub size: usize,
    pub transcription: Option<String>,
    pub has_transcription: bool,
    pub created_at: String,
}

fn row_to_content(row: &rusqlite::Row<'_>) -> rusqlite::Result<Content> {
    let kind: String = row.get(3)?;
    let media_kind = MediaKind::from_str(&kind).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Content {
        id: row.get(0)?,
        expert_id: row.get(1)?,
        subject: row.get(2)?,
        media_kind,
        file_name: row.get(4)?,
        hash: row.get(5)?,
        size: row.get::<_, i64>(6)? as usize,
        transcription: row.get(7)?,
        has_transcription: row.get::<_, i64>(8)? != 0,
        created_at: row.get(9)?,
    })
}

const CONTENT_COLUMNS: &str = "id, expert_id, subject, media_kind, file_name, hash, size,
     transcription, has_transcription, created_at";

impl Database {
    /// Insert content metadata, returning its id.
    ///
    /// Always created with transcription absent; the transcription pipeline
    /// fills it in later via [`Database::set_transcription`].
    pub fn insert_content(
        &self,
        expert_id: i64,
        subject: &str,
        media_kind: MediaKind,
        file_name: &str,
        hash: &str,
        size: usize,
    ) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO contents (expert_id, subject, media_kind, file_name, hash, size, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                expert_id,
                subject,
                media_kind.as_str(),
                file_name,
                hash,
                size as i64,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get content by id
    pub fn get_content(&self, id: i64) -> Result<Content> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM contents WHERE id = ?1", CONTENT_COLUMNS),
            params![id],
            row_to_content,
        );

        match result {
            Ok(content) => Ok(content),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(CounselError::ContentNotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// List content for an expert, newest first
    pub fn contents_by_expert(&self, expert_id: i64) -> Result<Vec<Content>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM contents WHERE expert_id = ?1 ORDER BY id DESC",
            CONTENT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![expert_id], row_to_content)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// List content for a subject, newest first
    pub fn contents_by_subject(&self, subject: &str) -> Result<Vec<Content>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM contents WHERE subject = ?1 ORDER BY id DESC",
            CONTENT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![subject], row_to_content)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Record the transcription for a content row, exactly once.
    ///
    /// A second call for the same content is an error: transcriptions are
    /// written by the pipeline alone and never overwritten.
    pub fn set_transcription(&self, id: i64, text: &str) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE contents SET transcription = ?2, has_transcription = 1
             WHERE id = ?1 AND has_transcription = 0",
            params![id, text],
        )?;
        if rows == 0 {
            // Either the row is missing or it already has a transcription.
            return match self.get_content(id) {
                Ok(_) => Err(CounselError::InvalidInput(format!(
                    "content {} already transcribed",
                    id
                ))),
                Err(e) => Err(e),
            };
        }
        Ok(())
    }

    /// Count stored content rows
    pub fn count_contents(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_expert() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let expert = db
            .create_expert("Dr. Chen", &["Leadership".to_string()], None)
            .unwrap();
        (db, expert)
    }

    #[test]
    fn media_kind_gating() {
        assert!(MediaKind::Audio.requires_transcription());
        assert!(MediaKind::Video.requires_transcription());
        assert!(!MediaKind::Document.requires_transcription());
        assert!(!MediaKind::Presentation.requires_transcription());
        assert!("slides".parse::<MediaKind>().is_err());
        assert_eq!("audio".parse::<MediaKind>().unwrap(), MediaKind::Audio);
    }

    #[test]
    fn content_starts_untranscribed() {
        let (db, expert) = db_with_expert();
        let id = db
            .insert_content(expert, "Leadership", MediaKind::Audio, "talk.mp3", "abc123", 42)
            .unwrap();

        let content = db.get_content(id).unwrap();
        assert!(content.transcription.is_none());
        assert!(!content.has_transcription);
    }

    #[test]
    fn transcription_set_exactly_once() {
        let (db, expert) = db_with_expert();
        let id = db
            .insert_content(expert, "Leadership", MediaKind::Audio, "talk.mp3", "abc123", 42)
            .unwrap();

        db.set_transcription(id, "Welcome everyone.").unwrap();
        let content = db.get_content(id).unwrap();
        assert!(content.has_transcription);
        assert_eq!(content.transcription.as_deref(), Some("Welcome everyone."));

        assert!(db.set_transcription(id, "overwrite").is_err());
    }

    #[test]
    fn unknown_stored_media_kind_is_rejected() {
        let (db, expert) = db_with_expert();
        // Plant a row that bypasses the schema CHECK, as a legacy or
        // hand-edited database could contain.
        db.conn
            .execute_batch("PRAGMA ignore_check_constraints = ON")
            .unwrap();
        db.conn
            .execute(
                "INSERT INTO contents (expert_id, subject, media_kind, file_name, hash, size, created_at)
                 VALUES (?1, 'Leadership', 'slides', 'deck.key', 'abc', 1, '2026-01-01T00:00:00Z')",
                rusqlite::params![expert],
            )
            .unwrap();

        let id = db.conn.last_insert_rowid();
        assert!(db.get_content(id).is_err());
    }
}
