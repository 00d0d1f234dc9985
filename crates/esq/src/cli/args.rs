//! Clap argument definitions for the `esq` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use esq_query::SortField;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "esq", version)]
#[command(about = "Compile structured filters into Elasticsearch Query DSL requests")]
pub struct Cli {
    /// Log verbosity (-v for debug, -vv for trace); RUST_LOG applies otherwise
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Never color output
    #[arg(long, global = true)]
    pub plain: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Input shared by every command that reads a filter file.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// JSON filter file: an array of filters, or {"groups": [...]}
    pub file: PathBuf,

    /// Combine filters on the same index with OR unless a group says otherwise
    #[arg(long)]
    pub or: bool,
}

/// Arguments for `esq compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    #[command(flatten)]
    /// Filter input.
    pub filters: FilterArgs,
}

/// Arguments for `esq search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    #[command(flatten)]
    /// Filter input.
    pub filters: FilterArgs,

    /// Index the request targets
    #[arg(short = 'i', long)]
    pub index: String,

    /// Zero-based page number
    #[arg(short = 'p', long, default_value_t = 0)]
    pub page: usize,

    /// Hits per page [default: search.page_size, 10]
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Sort entry as FIELD[:asc|desc], repeatable [default: search.sort]
    #[arg(short = 's', long = "sort", value_name = "FIELD:DIR")]
    pub sort: Vec<SortField>,
}

/// Arguments for `esq aggregate`.
#[derive(Args, Debug, Clone)]
pub struct AggregateCommand {
    #[command(flatten)]
    /// Filter input.
    pub filters: FilterArgs,

    /// Index the request targets
    #[arg(short = 'i', long)]
    pub index: String,

    /// Aggregation name
    #[arg(long)]
    pub name: String,

    /// Field to bucket by
    #[arg(short = 'f', long)]
    pub field: String,

    /// Composite source name [default: aggregation.key, "key"]
    #[arg(short = 'k', long)]
    pub key: Option<String>,

    /// Composite page size [default: aggregation.size, 1000]
    #[arg(short = 'n', long)]
    pub size: Option<usize>,
}

/// Arguments for `esq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create ~/.esq.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `esq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the per-index bool queries compiled from a filter file
    Compile(CompileCommand),

    /// Print a paginated, sorted search request for one index
    #[command(after_help = "\
Examples:
  esq search filters.json -i people                    First page, config defaults
  esq search filters.json -i people -p 2 -n 25         Third page of 25 hits
  esq search filters.json -i people -s age:desc -s id  Sort by age, then id")]
    Search(SearchCommand),

    /// Print a composite aggregation request for one index
    Aggregate(AggregateCommand),

    /// Create a commented .esq.toml in the current directory
    Init(InitCommand),

    /// Validate configuration and report problems
    Check,

    /// Show effective configuration settings
    Config,
}
