//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Adobe Analytics Reports CLI
#[derive(Parser, Debug)]
#[command(name = "adobe-reports")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Credentials file (JSON); falls back to AA_* environment variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify credentials by acquiring an access token
    Check,

    /// Execute a report definition
    Run {
        /// Report definition file (YAML)
        definition: PathBuf,

        /// Output file (stdout when omitted; required for parquet)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a report definition file
    Validate {
        /// Report definition file (YAML)
        definition: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Aligned plain-text table
    Pretty,
    /// Parquet file
    Parquet,
}
