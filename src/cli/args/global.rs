//! Global CLI options shared across all commands

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::config::Overrides;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; the config file is merged in `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.skillmatch/config.yaml)
    pub config: Option<String>,

    /// Bypass cache and fetch fresh data from GitHub
    pub no_cache: bool,

    pub github_token: Option<String>,
    pub llm_api_key: Option<String>,
    pub github_api_url: Option<String>,
    pub llm_api_url: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
            github_token: cli.github_token.clone(),
            llm_api_key: cli.llm_api_key.clone(),
            github_api_url: cli.github_api_url.clone(),
            llm_api_url: cli.llm_api_url.clone(),
            cache_dir: cli.cache_dir.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// The CLI/env layer of the settings
    pub fn overrides(&self) -> Overrides {
        Overrides {
            github_token: self.github_token.clone(),
            llm_api_key: self.llm_api_key.clone(),
            github_api_url: self.github_api_url.clone(),
            llm_api_url: self.llm_api_url.clone(),
            cache_dir: self.cache_dir.clone(),
        }
    }
}
