mod cmd;
mod corpus;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Quiet,
}

#[derive(Debug, Parser)]
#[command(
    name = "fidx",
    version,
    about = "In-memory index and query engine for field documentation corpora"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration, schema and corpus paths
    Doctor,

    /// Load the corpus and report indexing statistics
    Stats(StatsArgs),

    /// Run a structured query against the corpus
    Search(SearchArgs),

    /// Count documents matching a single constraint value
    Count(CountArgs),

    /// List transitive descendants along a hierarchy index
    Descendants(DescendantsArgs),
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Print a progress line for every batch of documents
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Full-text term ('*' matches everything in the selected categories)
    pub query: Option<String>,

    /// Restrict results to these categories (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Constraint: 'name=value', 'name~=value' (descendants) or
    /// 'name!=value' (subtract); values may be comma-separated; repeatable
    #[arg(long = "constraint")]
    pub constraints: Vec<String>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Skip this many results
    #[arg(long)]
    pub offset: Option<usize>,

    /// Sort mode
    #[arg(long, value_enum, default_value_t = SortArg::Identifier)]
    pub sort: SortArg,

    /// Restrict exact-match promotion to this category
    #[arg(long)]
    pub match_category: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,

    /// Shorthand for --output quiet (ids only)
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Identifier,
    ExactMatchFirst,
    None,
}

#[derive(Debug, Args)]
pub struct CountArgs {
    /// Constraint index name, e.g. 'period:match' or 'geometry:exist'
    pub name: String,

    /// Value to count, e.g. 'Iron Age' or 'KNOWN'
    pub value: String,
}

#[derive(Debug, Args)]
pub struct DescendantsArgs {
    /// Recursively searchable index name, e.g. 'isChildOf:contain'
    pub name: String,

    /// Seed document id(s)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Print ids only
    #[arg(long)]
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Stats(args) => {
            cmd::stats::run(cli.config.as_deref(), cli.profile.as_deref(), &args);
        }
        Commands::Search(args) => {
            cmd::search::run(cli.config.as_deref(), cli.profile.as_deref(), args);
        }
        Commands::Count(args) => {
            cmd::count::run(cli.config.as_deref(), cli.profile.as_deref(), &args);
        }
        Commands::Descendants(args) => {
            cmd::descendants::run(cli.config.as_deref(), cli.profile.as_deref(), &args);
        }
    }
}
