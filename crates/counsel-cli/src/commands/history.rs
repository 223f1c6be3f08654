//! History command

use crate::app::{HistoryArgs, OutputFormat};
use crate::output::{format_query_line, print_json};
use anyhow::Result;
use counsel_core::Database;
use serde_json::json;

pub fn run(args: HistoryArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let queries = if let Some(requester) = args.requester {
        db.queries_by_requester(requester)?
    } else if let Some(expert) = args.expert {
        db.queries_by_expert(expert)?
    } else if let Some(ref subject) = args.subject {
        db.queries_by_subject(subject)?
    } else {
        db.list_queries()?
    };

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = queries
                .iter()
                .map(|q| {
                    json!({
                        "id": q.id,
                        "requester_id": q.requester_id,
                        "expert_id": q.expert_id,
                        "subject": q.subject,
                        "question": q.question,
                        "degraded": q.degraded,
                        "credits_spent": q.credits_spent,
                        "created_at": q.created_at,
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        OutputFormat::Cli => {
            if queries.is_empty() {
                println!("No queries recorded");
            }
            for q in &queries {
                println!("{}", format_query_line(q, None));
            }
        }
    }
    Ok(())
}
