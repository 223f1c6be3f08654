//! Expert management commands

use crate::app::{ExpertAction, ExpertArgs, OutputFormat};
use crate::output::print_json;
use anyhow::Result;
use counsel_core::Database;
use serde_json::json;

pub fn run(args: ExpertArgs, db: &Database, format: OutputFormat) -> Result<()> {
    match args.action {
        ExpertAction::Add {
            display_name,
            subjects,
            bio,
        } => {
            let id = db.create_expert(&display_name, &subjects, bio.as_deref())?;
            match format {
                OutputFormat::Json => print_json(&json!({
                    "id": id,
                    "display_name": display_name,
                    "subjects": subjects,
                }))?,
                OutputFormat::Cli => {
                    println!("Created expert #{} ({})", id, display_name);
                }
            }
        }
        ExpertAction::List => {
            let experts = db.list_experts()?;
            match format {
                OutputFormat::Json => {
                    let rows: Vec<_> = experts
                        .iter()
                        .map(|e| {
                            json!({
                                "id": e.id,
                                "display_name": e.display_name,
                                "subjects": e.subjects,
                                "bio": e.bio,
                            })
                        })
                        .collect();
                    print_json(&rows)?;
                }
                OutputFormat::Cli => {
                    for e in &experts {
                        println!("#{} {} [{}]", e.id, e.display_name, e.subjects.join(", "));
                    }
                }
            }
        }
    }
    Ok(())
}
