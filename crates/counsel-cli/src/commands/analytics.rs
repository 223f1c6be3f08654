//! Analytics command

use crate::app::{AnalyticsArgs, OutputFormat};
use crate::output::print_json;
use anyhow::Result;
use counsel_core::{CounselError, Database};
use serde_json::json;

fn validate_timestamp(label: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value {
        chrono::DateTime::parse_from_rfc3339(value).map_err(|e| {
            CounselError::InvalidInput(format!("--{} must be RFC 3339: {}", label, e))
        })?;
    }
    Ok(())
}

pub fn run(args: AnalyticsArgs, db: &Database, format: OutputFormat) -> Result<()> {
    validate_timestamp("since", args.since.as_deref())?;
    validate_timestamp("until", args.until.as_deref())?;

    let analytics = db.query_analytics(args.expert, args.since.as_deref(), args.until.as_deref())?;

    match format {
        OutputFormat::Json => {
            print_json(&json!({
                "total_queries": analytics.total_queries,
                "total_credits": analytics.total_credits,
                "degraded_queries": analytics.degraded_queries,
                "subject_breakdown": analytics.subject_breakdown,
            }))?;
        }
        OutputFormat::Cli => {
            println!("Queries:          {}", analytics.total_queries);
            println!("Credits spent:    {}", analytics.total_credits);
            println!("Degraded answers: {}", analytics.degraded_queries);
            println!();
            println!("By subject:");
            let mut subjects: Vec<_> = analytics.subject_breakdown.iter().collect();
            subjects.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            for (subject, count) in subjects {
                println!("  {:<24} {}", subject, count);
            }
        }
    }
    Ok(())
}
