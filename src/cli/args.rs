//! Command line argument parsing for the sarissa-sync CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// sarissa-sync - bulk index payloads and multi-search planning for a search engine
#[derive(Parser, Debug, Clone)]
#[command(name = "sarissa-sync")]
#[command(about = "Build bulk-index and multi-search payloads for a search engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SyncArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Settings file (JSON with `connection` and `indexing` sections)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "SARISSA_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SyncArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Turn a JSON Lines record file into bulk-index NDJSON
    Bulk(BulkArgs),

    /// Turn a JSON Lines query file into a multi-search NDJSON payload
    #[command(name = "msearch")]
    MultiSearch(MultiSearchArgs),

    /// Show the resolved engine hosts
    Hosts,
}

/// Arguments for bulk indexing
#[derive(Parser, Debug, Clone)]
pub struct BulkArgs {
    /// Record file, one JSON object per line
    #[arg(value_name = "RECORDS_FILE")]
    pub records_file: PathBuf,

    /// Target index
    #[arg(short, long)]
    pub index: String,

    /// Document type
    #[arg(short = 't', long = "type")]
    pub doc_type: String,

    /// Field holding the document id
    #[arg(long, default_value = "id")]
    pub id_field: String,

    /// Boolean field that excludes a record when true (e.g. `draft`)
    #[arg(long)]
    pub exclude_field: Option<String>,

    /// Field sent as the routing parameter
    #[arg(long)]
    pub routing_field: Option<String>,

    /// Documents per bulk submission (overrides the settings file)
    #[arg(short, long)]
    pub bulk_limit: Option<usize>,

    /// Records read per page (overrides the settings file)
    #[arg(long)]
    pub query_limit: Option<usize>,

    /// Write NDJSON here instead of stdout
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for multi-search planning
#[derive(Parser, Debug, Clone)]
pub struct MultiSearchArgs {
    /// Query file, one JSON query body per line
    #[arg(value_name = "QUERIES_FILE")]
    pub queries_file: PathBuf,

    /// Index override applied to every query
    #[arg(short, long, default_value = "")]
    pub index: String,

    /// Type override applied to every query
    #[arg(short = 't', long = "type", default_value = "")]
    pub doc_type: String,

    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Page size (defaults to the settings file)
    #[arg(short = 's', long)]
    pub page_size: Option<usize>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
