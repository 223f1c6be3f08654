//! Embedding storage operations
//!
//! Embeddings are stored one per query as little-endian f32 BLOBs and
//! deleted together with their owning query (foreign key cascade).

use super::Database;
use crate::error::Result;
use chrono::Utc;
use rusqlite::params;

/// Stored embedding row
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub query_id: i64,
    pub subject: String,
    pub embedding: Vec<f32>,
}

impl Database {
    /// Attach an embedding to a query (at most one per query)
    pub fn attach_embedding(
        &self,
        query_id: i64,
        subject: &str,
        model: &str,
        embedding: &[f32],
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let embedding_bytes = embedding_to_bytes(embedding);
        self.conn.execute(
            "INSERT OR REPLACE INTO query_embeddings (query_id, subject, embedding, model, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![query_id, subject, embedding_bytes, model, now],
        )?;
        Ok(())
    }

    /// Get the embedding for a query, if one was stored
    pub fn get_embedding(&self, query_id: i64) -> Result<Option<Vec<f32>>> {
        let result = self.conn.query_row(
            "SELECT embedding FROM query_embeddings WHERE query_id = ?1",
            params![query_id],
            |row| {
                let bytes: Vec<u8> = row.get(0)?;
                Ok(bytes_to_embedding(&bytes))
            },
        );

        match result {
            Ok(embedding) => Ok(Some(embedding)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load all stored embeddings (used to seed the similarity index)
    pub fn all_embeddings(&self) -> Result<Vec<EmbeddingRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT query_id, subject, embedding FROM query_embeddings")?;

        let rows = stmt
            .query_map([], |row| {
                let bytes: Vec<u8> = row.get(2)?;
                Ok(EmbeddingRecord {
                    query_id: row.get(0)?,
                    subject: row.get(1)?,
                    embedding: bytes_to_embedding(&bytes),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Count stored embeddings
    pub fn count_embeddings(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM query_embeddings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Convert f32 embedding to bytes (little-endian)
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes to f32 embedding
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::QueryInsert;
    use crate::db::Role;

    #[test]
    fn embedding_byte_roundtrip() {
        let original = vec![1.0f32, 2.0, 3.0, -1.5];
        let bytes = embedding_to_bytes(&original);
        let restored = bytes_to_embedding(&bytes);
        assert_eq!(original, restored);
    }

    #[test]
    fn embedding_cascades_with_query() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let requester = db.create_account("alice", None, Role::Client, 1).unwrap();
        let expert = db
            .create_expert("Dr. Chen", &["Leadership".to_string()], None)
            .unwrap();
        let query_id = db
            .insert_query(&QueryInsert {
                requester_id: requester,
                expert_id: expert,
                subject: "Leadership",
                question: "q",
                response: "r",
                sources: &[],
                credits_spent: 1,
                degraded: false,
                failure_reason: None,
            })
            .unwrap();

        db.attach_embedding(query_id, "Leadership", "test-model", &[0.1, 0.2])
            .unwrap();
        assert_eq!(db.count_embeddings().unwrap(), 1);
        assert_eq!(db.get_embedding(query_id).unwrap().unwrap().len(), 2);

        db.delete_query(query_id).unwrap();
        assert_eq!(db.count_embeddings().unwrap(), 0);
        assert!(db.get_embedding(query_id).unwrap().is_none());
    }
}
