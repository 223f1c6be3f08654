//! Counsel CLI
//!
//! Credit-gated expert consultation with semantic retrieval.

use clap::Parser;
use counsel_core::{Config, CounselError, Database};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = e
            .downcast_ref::<CounselError>()
            .map(|ce| ce.exit_code())
            .unwrap_or(counsel_core::error::exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Open database (use COUNSEL_DB env var if set, otherwise use default)
    let db_path = std::env::var("COUNSEL_DB")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| Database::default_path());
    let db = Database::open(&db_path)?;
    db.initialize()?;

    let config = Config::load()?;

    match cli.command {
        Commands::Account(args) => commands::account::run(args, &db, cli.format),
        Commands::Expert(args) => commands::expert::run(args, &db, cli.format),
        Commands::History(args) => commands::history::run(args, &db, cli.format),
        Commands::Analytics(args) => commands::analytics::run(args, &db, cli.format),
        Commands::Status => commands::status::run(&db, cli.format),
        Commands::Ask(args) => commands::ask::run(args, db, config, cli.format).await,
        Commands::Similar(args) => commands::similar::run(args, db, config, cli.format).await,
        Commands::Upload(args) => commands::upload::run(args, db, config, cli.format).await,
    }
}
