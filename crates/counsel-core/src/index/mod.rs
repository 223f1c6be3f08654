//! In-memory similarity index over query embeddings
//!
//! Linear-scan cosine similarity. Ranking correctness and threshold
//! filtering are the contract; approximate indexes are a possible later
//! enhancement.

use crate::db::Database;
use crate::error::{CounselError, Result};
use std::sync::RwLock;

/// A ranked match from the index
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: i64,
    pub score: f32,
}

#[derive(Debug, Clone)]
struct Entry {
    id: i64,
    vector: Vec<f32>,
}

/// Stores (id, vector) pairs and ranks them by cosine similarity.
///
/// All vectors share one fixed dimensionality per index instance.
/// Concurrent inserts and searches are safe; a search observes each
/// vector entirely or not at all.
pub struct SimilarityIndex {
    dimensions: usize,
    entries: RwLock<Vec<Entry>>,
}

impl SimilarityIndex {
    /// Create an empty index for vectors of the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Build an index from the embeddings stored in the database.
    ///
    /// Rows whose dimensionality does not match (e.g. written under a
    /// different embedding model) are skipped with a warning.
    pub fn load(dimensions: usize, db: &Database) -> Result<Self> {
        let index = Self::new(dimensions);
        for record in db.all_embeddings()? {
            if let Err(e) = index.insert(record.query_id, record.embedding) {
                tracing::warn!("skipping stored embedding for query {}: {}", record.query_id, e);
            }
        }
        Ok(index)
    }

    /// Expected vector dimensionality
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.entries.read().expect("index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a vector under an id, replacing any previous vector for it
    pub fn insert(&self, id: i64, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(CounselError::DimensionMismatch {
                expected: self.dimensions,
                got: vector.len(),
            });
        }

        let mut entries = self.entries.write().expect("index lock poisoned");
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.vector = vector;
        } else {
            entries.push(Entry { id, vector });
        }
        Ok(())
    }

    /// Remove a vector by id, returning whether it was present
    pub fn remove(&self, id: i64) -> bool {
        let mut entries = self.entries.write().expect("index lock poisoned");
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Rank all entries against a lookup vector.
    ///
    /// Results are sorted by non-increasing score, restricted to
    /// score >= threshold, and truncated to `limit`.
    pub fn search(&self, vector: &[f32], threshold: f32, limit: usize) -> Result<Vec<Match>> {
        if vector.len() != self.dimensions {
            return Err(CounselError::DimensionMismatch {
                expected: self.dimensions,
                got: vector.len(),
            });
        }

        let entries = self.entries.read().expect("index lock poisoned");
        let mut matches: Vec<Match> = entries
            .iter()
            .map(|entry| Match {
                id: entry.id,
                score: cosine_similarity(vector, &entry.vector),
            })
            .filter(|m| m.score >= threshold)
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(limit);
        Ok(matches)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Defined as 0.0 when the lengths differ or either norm is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cosine_identical_is_one() {
        let a = vec![1.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);
    }

    #[test]
    fn cosine_zero_vector_is_zero() {
        let zero = vec![0.0, 0.0];
        let a = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&zero, &a), 0.0);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn cosine_length_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_is_magnitude_independent() {
        let a = vec![1.0, 2.0, 3.0];
        let b: Vec<f32> = a.iter().map(|x| x * 10.0).collect();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn insert_rejects_wrong_dimensions() {
        let index = SimilarityIndex::new(3);
        match index.insert(1, vec![1.0, 0.0]) {
            Err(CounselError::DimensionMismatch { expected: 3, got: 2 }) => {}
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
        assert!(index.is_empty());
    }

    #[test]
    fn search_orders_and_filters() {
        let index = SimilarityIndex::new(2);
        index.insert(1, vec![1.0, 0.0]).unwrap();
        index.insert(2, vec![0.0, 1.0]).unwrap();
        index.insert(3, vec![1.0, 1.0]).unwrap();

        let matches = index.search(&[1.0, 0.0], 0.5, 10).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, 1);
        assert!((matches[0].score - 1.0).abs() < 0.0001);
        assert_eq!(matches[1].id, 3);
        for m in &matches {
            assert!(m.score >= 0.5);
        }
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn search_respects_limit() {
        let index = SimilarityIndex::new(2);
        for id in 0..5 {
            index.insert(id, vec![1.0, id as f32 * 0.01]).unwrap();
        }
        let matches = index.search(&[1.0, 0.0], 0.0, 2).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn insert_replaces_existing_id() {
        let index = SimilarityIndex::new(2);
        index.insert(1, vec![1.0, 0.0]).unwrap();
        index.insert(1, vec![0.0, 1.0]).unwrap();
        assert_eq!(index.len(), 1);

        let matches = index.search(&[0.0, 1.0], 0.9, 10).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);
    }

    #[test]
    fn remove_drops_entry() {
        let index = SimilarityIndex::new(2);
        index.insert(1, vec![1.0, 0.0]).unwrap();
        assert!(index.remove(1));
        assert!(!index.remove(1));
        assert!(index.is_empty());
    }

    proptest! {
        #[test]
        fn cosine_is_symmetric(
            a in prop::collection::vec(-100.0f32..100.0, 4),
            b in prop::collection::vec(-100.0f32..100.0, 4),
        ) {
            let ab = cosine_similarity(&a, &b);
            let ba = cosine_similarity(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-5);
        }

        #[test]
        fn cosine_self_similarity_is_one(
            a in prop::collection::vec(0.1f32..100.0, 4),
        ) {
            let sim = cosine_similarity(&a, &a);
            prop_assert!((sim - 1.0).abs() < 1e-4);
        }

        #[test]
        fn search_never_returns_below_threshold(
            vectors in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 3), 1..20),
            threshold in 0.0f32..1.0,
        ) {
            let index = SimilarityIndex::new(3);
            for (i, v) in vectors.iter().enumerate() {
                index.insert(i as i64, v.clone()).unwrap();
            }
            let matches = index.search(&[1.0, 0.5, -0.5], threshold, 100).unwrap();
            for m in &matches {
                prop_assert!(m.score >= threshold);
            }
            for pair in matches.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
