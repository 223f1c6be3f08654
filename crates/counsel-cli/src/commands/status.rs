//! Status command

use crate::app::OutputFormat;
use crate::output::print_json;
use anyhow::Result;
use counsel_core::Database;
use serde_json::json;

pub fn run(db: &Database, format: OutputFormat) -> Result<()> {
    let accounts = db.list_accounts()?.len();
    let experts = db.list_experts()?.len();
    let queries = db.count_queries()?;
    let embeddings = db.count_embeddings()?;
    let contents = db.count_contents()?;

    match format {
        OutputFormat::Json => {
            print_json(&json!({
                "accounts": accounts,
                "experts": experts,
                "queries": queries,
                "embeddings": embeddings,
                "contents": contents,
            }))?;
        }
        OutputFormat::Cli => {
            println!("Accounts:    {}", accounts);
            println!("Experts:     {}", experts);
            println!("Queries:     {}", queries);
            println!("  Embedded:  {}", embeddings);
            println!("Contents:    {}", contents);
        }
    }
    Ok(())
}
