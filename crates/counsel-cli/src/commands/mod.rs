//! Command implementations

pub mod account;
pub mod analytics;
pub mod ask;
pub mod expert;
pub mod history;
pub mod similar;
pub mod status;
pub mod upload;

use counsel_core::{Config, Database, LlmClient, OpenAiClient, QueryOrchestrator, SimilarityIndex};
use std::sync::{Arc, Mutex};

/// Build an orchestrator over the opened database, seeding the similarity
/// index from stored embeddings. The client handle is returned alongside so
/// commands can report its request metrics.
pub(crate) fn build_orchestrator(
    db: Database,
    config: &Config,
) -> anyhow::Result<(QueryOrchestrator, Arc<OpenAiClient>)> {
    let client = Arc::new(OpenAiClient::new(config.llm_service.clone())?);
    let index = SimilarityIndex::load(config.llm_service.embedding_dimensions, &db)?;
    let llm: Arc<dyn LlmClient> = client.clone();
    let orchestrator = QueryOrchestrator::new(
        Arc::new(Mutex::new(db)),
        llm,
        Arc::new(index),
        config.clone(),
    );
    Ok((orchestrator, client))
}
