//! Ask command

use crate::app::{AskArgs, OutputFormat};
use crate::output::{print_degraded_notice, print_json};
use anyhow::Result;
use counsel_core::{Config, Database};

pub async fn run(args: AskArgs, db: Database, config: Config, format: OutputFormat) -> Result<()> {
    let question = args.question.join(" ");
    let (orchestrator, client) = super::build_orchestrator(db, &config)?;

    let result = orchestrator
        .ask(args.requester, args.expert, &args.subject, &question)
        .await?;

    let balance = orchestrator.ledger().balance(args.requester)?;

    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&result)?;
            value["balance"] = serde_json::json!(balance);
            value["stats"] = serde_json::to_value(orchestrator.stats())?;
            value["api"] = serde_json::to_value(client.metrics())?;
            print_json(&value)?;
        }
        OutputFormat::Cli => {
            if result.degraded {
                print_degraded_notice();
            }
            println!("{}", result.response);
            println!();
            println!("Sources: {}", result.sources.join(", "));
            println!(
                "Query #{} | credits spent: {} | balance: {}",
                result.query_id, result.credits_spent, balance
            );
        }
    }
    Ok(())
}
