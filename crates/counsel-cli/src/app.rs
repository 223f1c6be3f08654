//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "counsel")]
#[command(
    author,
    version,
    about = "Credit-gated expert consultation with semantic retrieval"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage requester accounts and credits
    Account(AccountArgs),

    /// Manage experts
    Expert(ExpertArgs),

    /// Ask a question (debits one credit for client accounts)
    Ask(AskArgs),

    /// Find past queries similar to a text
    Similar(SimilarArgs),

    /// Upload expert content (audio/video is transcribed)
    Upload(UploadArgs),

    /// List past queries
    History(HistoryArgs),

    /// Aggregate query analytics
    Analytics(AnalyticsArgs),

    /// Show store status
    Status,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}

#[derive(Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub action: AccountAction,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Add a new account
    Add {
        name: String,
        #[arg(long, default_value = "client")]
        role: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 0)]
        credits: i64,
    },
    /// List all accounts
    List,
    /// Add credits to an account
    Topup { owner_id: i64, amount: i64 },
    /// Show the balance of an account
    Balance { owner_id: i64 },
}

#[derive(Args)]
pub struct ExpertArgs {
    #[command(subcommand)]
    pub action: ExpertAction,
}

#[derive(Subcommand)]
pub enum ExpertAction {
    /// Add a new expert
    Add {
        display_name: String,
        /// Subjects the expert covers (repeatable)
        #[arg(long = "subject")]
        subjects: Vec<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// List all experts
    List,
}

#[derive(Args)]
pub struct AskArgs {
    /// Requester account id
    #[arg(long)]
    pub requester: i64,

    /// Expert id
    #[arg(long)]
    pub expert: i64,

    /// Consultation subject
    #[arg(long)]
    pub subject: String,

    /// The question to ask
    pub question: Vec<String>,
}

#[derive(Args)]
pub struct SimilarArgs {
    /// Lookup text
    pub text: Vec<String>,

    /// Minimum cosine similarity (0.0 - 1.0)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Owning expert id
    #[arg(long)]
    pub expert: i64,

    /// Content subject
    #[arg(long)]
    pub subject: String,

    /// Declared media kind
    #[arg(long)]
    pub kind: String,

    /// File to upload
    pub file: PathBuf,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Filter by requester account id
    #[arg(long)]
    pub requester: Option<i64>,

    /// Filter by expert id
    #[arg(long)]
    pub expert: Option<i64>,

    /// Filter by subject
    #[arg(long)]
    pub subject: Option<String>,
}

#[derive(Args)]
pub struct AnalyticsArgs {
    /// Filter by expert id
    #[arg(long)]
    pub expert: Option<i64>,

    /// Lower bound, RFC 3339
    #[arg(long)]
    pub since: Option<String>,

    /// Upper bound, RFC 3339
    #[arg(long)]
    pub until: Option<String>,
}
