//! Command-line parsing for the series explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the alignment/analytics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{ChangeBasis, SortOrder};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sx", version, about = "Economic time-series explorer (align, summarize, rank)")]
pub struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Align series on a common period axis and print the table with changes.
    Table(ExploreArgs),
    /// Print distribution summaries (min/max/quartiles/percentile of latest value).
    Summary(ExploreArgs),
    /// Print the top gainers and losers by latest percent change.
    Movers(ExploreArgs),
}

/// Common options for every command.
#[derive(Debug, Parser, Clone)]
pub struct ExploreArgs {
    /// Series payload files (JSON, one series per file).
    #[arg(required = true, value_name = "JSON")]
    pub files: Vec<PathBuf>,

    /// Trailing window in years (0 = all history).
    #[arg(short = 'y', long, default_value_t = 0)]
    pub years: u32,

    /// Row order of the aligned table.
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Show top-N gainers and losers.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Change used for ranking movers.
    #[arg(long, value_enum, default_value_t = ChangeBasis::Prior)]
    pub basis: ChangeBasis,

    /// Restrict the summary to one series id.
    #[arg(long)]
    pub series: Option<String>,

    /// Export aligned rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export aligned rows to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}
