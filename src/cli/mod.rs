//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Minimal issue-tracking HTTP API over a JSONL file
#[derive(Parser, Debug)]
#[command(name = "issue-api", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./issue-api.yaml if present)
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// JSONL data file holding the issue collection
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output errors and results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Print the resolved configuration
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen address, e.g. 127.0.0.1:8000
    #[arg(long)]
    pub addr: Option<String>,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,
}
