//! Query orchestration
//!
//! The façade over admission control, response generation, fallback,
//! embedding enrichment, and persistence. Each `ask` walks a fixed path:
//! validate, reserve credit, generate (or degrade), embed best-effort,
//! persist exactly one query record.

mod upload;

pub use upload::{TranscriptionGate, UploadOutcome};

use crate::config::Config;
use crate::db::{Database, QueryInsert, QueryRecord};
use crate::error::{CounselError, Result};
use crate::index::SimilarityIndex;
use crate::ledger::{CreditLedger, Receipt};
use crate::llm::{fallback_answer, LlmClient, ResponseGenerator, FALLBACK_SOURCE};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Result of a successful `ask` (live or degraded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResult {
    pub query_id: i64,
    pub question: String,
    pub response: String,
    pub sources: Vec<String>,
    pub degraded: bool,
    pub credits_spent: i64,
}

/// A past query ranked by similarity to a lookup text
#[derive(Debug, Clone)]
pub struct SimilarQuery {
    pub query: QueryRecord,
    pub score: f32,
}

/// Per-outcome counters. Degraded answers are tracked apart from live
/// ones so analytics never report canned responses as model usage.
#[derive(Debug, Default)]
pub struct OrchestratorStats {
    answered: AtomicU64,
    degraded: AtomicU64,
    rejected: AtomicU64,
}

/// Snapshot of orchestrator counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub answered: u64,
    pub degraded: u64,
    pub rejected: u64,
}

impl OrchestratorStats {
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            answered: self.answered.load(Ordering::Relaxed),
            degraded: self.degraded.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Orchestrates the full lifecycle of a consultation query.
///
/// All collaborators are injected at construction; tests substitute an
/// in-memory database and a fake [`LlmClient`].
pub struct QueryOrchestrator {
    db: Arc<Mutex<Database>>,
    llm: Arc<dyn LlmClient>,
    index: Arc<SimilarityIndex>,
    generator: ResponseGenerator,
    ledger: CreditLedger,
    config: Config,
    stats: OrchestratorStats,
}

impl QueryOrchestrator {
    pub fn new(
        db: Arc<Mutex<Database>>,
        llm: Arc<dyn LlmClient>,
        index: Arc<SimilarityIndex>,
        config: Config,
    ) -> Self {
        Self {
            generator: ResponseGenerator::new(llm.clone()),
            ledger: CreditLedger::new(db.clone()),
            db,
            llm,
            index,
            config,
            stats: OrchestratorStats::default(),
        }
    }

    /// Shared credit ledger (same database handle)
    pub fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }

    /// Orchestrator counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Answer a question on behalf of a requester.
    ///
    /// Rejections (invalid input, unknown references, insufficient credit)
    /// leave no side effects. Once admitted, the call always produces
    /// exactly one persisted query record: a generation failure degrades to
    /// the canned answer for the subject without refunding the credit, and
    /// an embedding failure merely leaves the record out of the similarity
    /// index.
    pub async fn ask(
        &self,
        requester_id: i64,
        expert_id: i64,
        subject: &str,
        question: &str,
    ) -> Result<AskResult> {
        let question = question.trim();
        let subject = subject.trim();

        // Received -> Rejected: validation, no side effects.
        let admission = self.admit(requester_id, expert_id, subject, question);
        let receipt = match admission {
            Ok(receipt) => receipt,
            Err(e) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };
        let credits_spent = receipt.as_ref().map(|r| r.amount).unwrap_or(0);

        // Admitted -> Generating -> {Answered | Degraded}.
        let (response, sources, degraded, failure_reason) =
            match self.generator.generate(question, subject).await {
                Ok(answer) => (answer.text, answer.sources, false, None),
                Err(e) => {
                    // A canned answer still counts as delivery; the credit
                    // stays debited.
                    tracing::warn!("generation failed, serving canned answer: {}", e);
                    (
                        fallback_answer(subject).to_string(),
                        vec![FALLBACK_SOURCE.to_string()],
                        true,
                        Some(e.to_string()),
                    )
                }
            };

        // Best-effort enrichment; never blocks persistence.
        let embedding = match self.llm.embed(question).await {
            Ok(vector) if vector.len() == self.index.dimensions() => Some(vector),
            Ok(vector) => {
                tracing::warn!(
                    "embedding has {} dimensions, index expects {}; skipping",
                    vector.len(),
                    self.index.dimensions()
                );
                None
            }
            Err(e) => {
                tracing::warn!("embedding failed, query will not be searchable: {}", e);
                None
            }
        };

        // {Answered | Degraded} -> Persisted.
        let query_id = match self.persist(
            requester_id,
            expert_id,
            subject,
            question,
            &response,
            &sources,
            credits_spent,
            degraded,
            failure_reason.as_deref(),
            embedding.as_deref(),
        ) {
            Ok(id) => id,
            Err(e) => {
                // Persistence failed after the debit: the requester got
                // nothing, so the reservation is reversed.
                if let Some(ref receipt) = receipt {
                    if let Err(refund_err) = self.ledger.refund(receipt) {
                        tracing::warn!(
                            "refund of receipt {} after failed persist also failed: {}",
                            receipt.id,
                            refund_err
                        );
                    }
                }
                return Err(e);
            }
        };

        if let Some(vector) = embedding {
            if let Err(e) = self.index.insert(query_id, vector) {
                tracing::warn!("failed to index embedding for query {}: {}", query_id, e);
            }
        }

        if degraded {
            self.stats.degraded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.answered.fetch_add(1, Ordering::Relaxed);
        }

        Ok(AskResult {
            query_id,
            question: question.to_string(),
            response,
            sources,
            degraded,
            credits_spent,
        })
    }

    /// Find past queries semantically similar to a lookup text,
    /// most-similar first.
    ///
    /// Unlike the indexing step of `ask`, an embedding failure here is an
    /// error: without a lookup vector there is nothing to search with.
    pub async fn find_similar(
        &self,
        text: &str,
        threshold: Option<f32>,
        limit: Option<usize>,
    ) -> Result<Vec<SimilarQuery>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CounselError::InvalidInput(
                "lookup text must not be empty".to_string(),
            ));
        }

        let threshold = threshold.unwrap_or(self.config.search.default_threshold);
        let limit = limit.unwrap_or(self.config.search.default_limit);

        let vector = self.llm.embed(text).await?;
        let matches = self.index.search(&vector, threshold, limit)?;

        let db = self.db.lock().expect("database lock poisoned");
        let mut results = Vec::with_capacity(matches.len());
        for m in matches {
            match db.get_query(m.id) {
                Ok(query) => results.push(SimilarQuery {
                    query,
                    score: m.score,
                }),
                // Index can briefly hold ids whose rows were deleted.
                Err(CounselError::QueryNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(results)
    }

    /// Validate the request and reserve credit where the role requires it.
    /// Returns `None` for roles exempt from debiting.
    fn admit(
        &self,
        requester_id: i64,
        expert_id: i64,
        subject: &str,
        question: &str,
    ) -> Result<Option<Receipt>> {
        if question.is_empty() {
            return Err(CounselError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }
        if subject.is_empty() {
            return Err(CounselError::InvalidInput(
                "subject must not be empty".to_string(),
            ));
        }

        let role = {
            let db = self.db.lock().expect("database lock poisoned");
            db.get_expert(expert_id)?;
            db.get_account(requester_id)?.role
        };

        if role.pays_credits() {
            let receipt = self
                .ledger
                .reserve(requester_id, self.config.credits.query_cost)?;
            Ok(Some(receipt))
        } else {
            // Experts and admins never pay for queries.
            Ok(None)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn persist(
        &self,
        requester_id: i64,
        expert_id: i64,
        subject: &str,
        question: &str,
        response: &str,
        sources: &[String],
        credits_spent: i64,
        degraded: bool,
        failure_reason: Option<&str>,
        embedding: Option<&[f32]>,
    ) -> Result<i64> {
        let db = self.db.lock().expect("database lock poisoned");
        let query_id = db.insert_query(&QueryInsert {
            requester_id,
            expert_id,
            subject,
            question,
            response,
            sources,
            credits_spent,
            degraded,
            failure_reason,
        })?;

        if let Some(vector) = embedding {
            // Late-arriving embedding is the one permitted mutation.
            if let Err(e) = db.attach_embedding(query_id, subject, self.llm.model_name(), vector) {
                tracing::warn!("failed to store embedding for query {}: {}", query_id, e);
            }
        }

        Ok(query_id)
    }
}
