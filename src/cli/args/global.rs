//! Global CLI options shared across all commands

use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// Precedence is: CLI flag > environment variable > config file > default.
/// This struct holds the CLI/env layer; the config file is merged in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.transip-dns/config.yaml)
    pub config: Option<PathBuf>,

    /// Dump HTTP traffic to stderr
    pub dump_http: bool,

    /// Token storage override (`memory` or a directory)
    pub storage: Option<String>,

    /// API endpoint override
    pub base_uri: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
}

impl GlobalOptions {
    /// Called once in main.rs after parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            dump_http: cli.dump_http,
            storage: cli.storage.clone(),
            base_uri: cli.base_uri.clone(),
            timeout: cli.timeout,
        }
    }

    pub fn config_ref(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}
