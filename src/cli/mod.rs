//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod context;
pub mod ping;
pub mod records;
pub mod status;
pub mod zones;

pub use args::{GlobalOptions, OutputFormat, RecordArgs, RecordFilterArgs};
pub use context::CommandContext;

/// Manage DNS zones hosted at TransIP
#[derive(Parser, Debug)]
#[command(name = "transip-dns")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "TRANSIP_DNS_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "TRANSIP_DNS_CONFIG", hide_env = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, env = "TRANSIP_DNS_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Dump HTTP requests and responses to stderr
    #[arg(long, global = true)]
    pub dump_http: bool,

    /// Token storage: `memory` or a directory
    #[arg(long, global = true, env = "TRANSIP_DNS_STORAGE", hide_env = true)]
    pub storage: Option<String>,

    /// Override the API endpoint
    #[arg(long, global = true, env = "TRANSIP_DNS_BASE_URI", hide_env = true)]
    pub base_uri: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the API answers
    Ping,

    /// List the domains of the account
    Zones,

    /// List and change DNS records
    #[command(subcommand)]
    Records(RecordCommands),

    /// Show configuration and token status
    Status,
}

/// Record subcommands
#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// List the records of a zone
    List {
        /// Zone name, e.g. example.com
        zone: String,
    },

    /// Add a record unless it already exists
    Append {
        zone: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Replace all records with this name and type
    Set {
        zone: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Delete matching records
    Delete {
        zone: String,

        #[command(flatten)]
        filter: RecordFilterArgs,
    },
}
