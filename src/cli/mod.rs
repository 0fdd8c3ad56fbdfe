//! CLI implementation using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::log::LogFormat;
use crate::output::Format;

/// commitlens - Mine commit logs for keywords, defect trends and co-change coupling.
#[derive(Parser)]
#[command(name = "commitlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the exported commit log (overrides `log.path`)
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Log layout: oneline, block or detailed (overrides `log.format`)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Output format (overrides `output.format`)
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank the most frequent commit-message keywords
    #[command(alias = "kw")]
    Keywords(KeywordsArgs),

    /// Count defect-related commits per month and per file
    #[command(alias = "bugs")]
    Defects(DefectsArgs),

    /// Rank files that change together
    #[command(alias = "cc")]
    Coupling(CouplingArgs),

    /// Find the test file associated with a source file
    #[command(alias = "assoc")]
    Associate(AssociateArgs),

    /// Run keyword, defect and coupling analysis together
    All(AllArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
pub struct KeywordsArgs {
    /// Maximum number of keywords
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// File with additional stopwords, one per line
    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    /// Do not use the built-in English stopword list
    #[arg(long)]
    pub no_default_stopwords: bool,
}

#[derive(Args)]
pub struct DefectsArgs {
    /// Defect keyword (repeatable, replaces the configured list)
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Number of files reported with a monthly breakdown
    #[arg(long)]
    pub top_files: Option<usize>,
}

#[derive(Args)]
pub struct CouplingArgs {
    /// Maximum number of pairs
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Minimum number of co-changes to report a pair
    #[arg(long)]
    pub min_cochanges: Option<u32>,
}

#[derive(Args)]
pub struct AssociateArgs {
    /// Source file to find a test file for
    pub file: String,

    /// Directory listing candidate test files
    #[arg(long)]
    pub test_dir: Option<PathBuf>,

    /// Candidate test file (repeatable, in priority order)
    #[arg(long = "candidate")]
    pub candidates: Vec<String>,
}

#[derive(Args)]
pub struct AllArgs {
    /// Maximum number of keywords and pairs
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
