//! Command execution context
//!
//! Loads the config file, applies command line overrides and builds the
//! provider, so each command only deals with its own work.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use transip_dns::client::{DebugLevel, DebugSink};
use transip_dns::{Provider, ProviderConfig, RequestOptions, Result};

use crate::cli::{GlobalOptions, OutputFormat};

/// Context for command execution containing config, provider, and runtime options.
pub struct CommandContext {
    pub provider: Provider,
    pub format: OutputFormat,
    /// Cancellation and timeout for every API call of the command
    pub options: RequestOptions,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// # Errors
    /// Returns error if the config cannot be loaded or is incomplete.
    pub fn new(opts: &GlobalOptions, cancel: CancellationToken) -> Result<Self> {
        let (path, config) = load_config(opts)?;
        log::debug!("Using config {}", path.display());
        let provider = Provider::from_config(config)?;

        let mut options = RequestOptions::new().with_cancel(cancel);
        if let Some(secs) = opts.timeout {
            options = options.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            provider,
            format: opts.format,
            options,
        })
    }
}

/// Resolve the config path, load it and apply the command line overrides
pub fn load_config(opts: &GlobalOptions) -> Result<(PathBuf, ProviderConfig)> {
    let path = match opts.config_ref() {
        Some(path) => path.to_path_buf(),
        None => ProviderConfig::default_path()?,
    };

    let mut config = ProviderConfig::load_from(&path)?;

    if let Some(ref storage) = opts.storage {
        config.token_storage = storage.clone();
    }
    if let Some(ref base_uri) = opts.base_uri {
        config.base_uri = Some(base_uri.clone());
        config.validate()?;
    }
    if opts.dump_http {
        config.set_debug_sink(DebugSink::new(DebugLevel::Full, std::io::stderr()));
    }

    Ok((path, config))
}
