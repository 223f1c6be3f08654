//! Expert operations

use super::Database;
use crate::error::{CounselError, Result};
use chrono::Utc;
use rusqlite::params;

/// Expert record from database
#[derive(Debug, Clone)]
pub struct Expert {
    pub id: i64,
    pub display_name: String,
    pub subjects: Vec<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

impl Database {
    /// Create a new expert, returning its id
    pub fn create_expert(
        &self,
        display_name: &str,
        subjects: &[String],
        bio: Option<&str>,
    ) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let subjects_json = serde_json::to_string(subjects)?;
        self.conn.execute(
            "INSERT INTO experts (display_name, subjects, bio, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![display_name, subjects_json, bio, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get expert by id
    pub fn get_expert(&self, id: i64) -> Result<Expert> {
        let result = self.conn.query_row(
            "SELECT id, display_name, subjects, bio, created_at
             FROM experts WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        );

        match result {
            Ok((id, display_name, subjects_json, bio, created_at)) => Ok(Expert {
                id,
                display_name,
                subjects: serde_json::from_str(&subjects_json).unwrap_or_default(),
                bio,
                created_at,
            }),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(CounselError::ExpertNotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// List all experts
    pub fn list_experts(&self) -> Result<Vec<Expert>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, display_name, subjects, bio, created_at
             FROM experts ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|(id, display_name, subjects_json, bio, created_at)| Expert {
                id,
                display_name,
                subjects: serde_json::from_str(&subjects_json).unwrap_or_default(),
                bio,
                created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expert_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();

        let id = db
            .create_expert(
                "Dr. Chen",
                &["Leadership".to_string(), "Business Strategy".to_string()],
                Some("20 years of executive coaching"),
            )
            .unwrap();

        let expert = db.get_expert(id).unwrap();
        assert_eq!(expert.display_name, "Dr. Chen");
        assert_eq!(expert.subjects.len(), 2);

        match db.get_expert(id + 1) {
            Err(CounselError::ExpertNotFound(_)) => {}
            other => panic!("expected ExpertNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
