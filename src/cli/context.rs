//! Command execution context
//!
//! Loads configuration once, resolves it into [`Settings`] and builds the
//! GitHub and language-model clients every data command needs.

use std::sync::Arc;

use log::{debug, warn};

use crate::cache::{CacheStorage, SourceClient};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{GitHubClient, RateLimitGuard};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, Settings};
use crate::error::Result;
use crate::llm::GeminiClient;
use crate::recommend::RankOptions;

/// Context for command execution containing settings, clients and runtime options.
pub struct CommandContext {
    pub settings: Settings,
    /// Cache-first, rate-guarded GitHub access
    pub source: SourceClient<GitHubClient>,
    pub clock: Arc<dyn Clock>,
    pub format: OutputFormat,
}

/// Load the config file and merge the CLI/env layer over it.
///
/// Used directly by commands that need no GitHub access (`status`, `cache`).
pub fn load_settings(opts: &GlobalOptions) -> Result<Settings> {
    let config = Config::load_at(opts.config_ref())?;
    let path = Config::resolve_path(opts.config_ref())?;
    Settings::resolve(config, path, opts.overrides())
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or no GitHub token is configured.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let settings = load_settings(opts)?;
        let token = settings.require_github_token()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let github = GitHubClient::new(token, &settings.github_api_url)?;
        let cache = if opts.no_cache {
            debug!("Cache disabled (--no-cache)");
            None
        } else {
            open_cache(&settings, clock.clone())
        };
        let guard = RateLimitGuard::new(
            clock.clone(),
            settings.low_water_mark,
            settings.safety_margin,
        );

        Ok(Self {
            source: SourceClient::new(github, cache, guard),
            settings,
            clock,
            format: opts.format,
        })
    }

    /// Language-model client for extraction, comparison and assessment.
    ///
    /// # Errors
    /// Returns error if no LLM API key is configured.
    pub fn skill_service(&self) -> Result<GeminiClient> {
        let key = self.settings.require_llm_api_key()?;
        Ok(GeminiClient::new(
            key,
            &self.settings.llm_api_url,
            self.settings.retry,
            self.clock.clone(),
        )?)
    }

    /// Ranking options from settings, with per-command overrides applied
    pub fn rank_options(&self, limit: Option<usize>, min_score: Option<f64>) -> RankOptions {
        RankOptions {
            min_score: min_score.unwrap_or(self.settings.min_score),
            limit: limit.unwrap_or(self.settings.limit),
            extraction_delay: self.settings.extraction_delay,
        }
    }
}

/// The cache is an optimization: if it cannot be opened, run without it.
fn open_cache(settings: &Settings, clock: Arc<dyn Clock>) -> Option<CacheStorage> {
    let dir = settings.cache_dir.as_deref()?;
    match CacheStorage::open_at(dir, settings.cache_ttl, clock) {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!("Cache unavailable at {}: {}", dir.display(), e);
            None
        }
    }
}
