//! Similarity search command

use crate::app::{OutputFormat, SimilarArgs};
use crate::output::{format_query_line, print_json};
use anyhow::Result;
use counsel_core::{Config, Database};
use serde_json::json;

pub async fn run(
    args: SimilarArgs,
    db: Database,
    config: Config,
    format: OutputFormat,
) -> Result<()> {
    let text = args.text.join(" ");
    let (orchestrator, _) = super::build_orchestrator(db, &config)?;

    let results = orchestrator
        .find_similar(&text, args.threshold, args.limit)
        .await?;

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = results
                .iter()
                .map(|r| {
                    json!({
                        "query_id": r.query.id,
                        "score": r.score,
                        "subject": r.query.subject,
                        "question": r.query.question,
                        "degraded": r.query.degraded,
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        OutputFormat::Cli => {
            if results.is_empty() {
                println!("No similar queries found");
            }
            for r in &results {
                println!("{}", format_query_line(&r.query, Some(r.score)));
            }
        }
    }
    Ok(())
}
