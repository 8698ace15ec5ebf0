//! Configuration management for skillmatch
//!
//! The YAML file is optional. [`Settings`] is the resolved view every client
//! is built from: CLI flag, then environment (both via clap), then the file,
//! then the built-in default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheTtl;
use crate::client::github::DEFAULT_API_URL;
use crate::client::rate_limit::{DEFAULT_LOW_WATER_MARK, DEFAULT_SAFETY_MARGIN};
use crate::error::{ConfigError, Result};
use crate::llm::RetryPolicy;
use crate::llm::gemini::DEFAULT_LLM_URL;
use crate::recommend::DEFAULT_ISSUES_FILE;
use crate::recommend::engine::{DEFAULT_EXTRACTION_DELAY, DEFAULT_LIMIT, DEFAULT_MIN_SCORE};

/// Repositories analyzed per user unless overridden
pub const DEFAULT_REPO_LIMIT: usize = 20;

/// Application configuration as written in `config.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub personal access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// Language-model API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_api_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_api_url: Option<String>,

    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub recommend: RecommendConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_secs: CacheTtl::DEFAULT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub low_water_mark: u32,
    pub safety_margin_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            low_water_mark: DEFAULT_LOW_WATER_MARK,
            safety_margin_secs: DEFAULT_SAFETY_MARGIN.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub min_score: f64,
    pub limit: usize,
    pub extraction_delay_ms: u64,
    pub issues_file: PathBuf,
    pub repo_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            limit: DEFAULT_LIMIT,
            extraction_delay_ms: DEFAULT_EXTRACTION_DELAY.as_millis() as u64,
            issues_file: PathBuf::from(DEFAULT_ISSUES_FILE),
            repo_limit: DEFAULT_REPO_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub max_attempts: u32,
    pub max_backoff_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            max_backoff_secs: policy.max_backoff.as_secs(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".skillmatch").join("config.yaml"))
    }

    /// Resolve the config path: the explicit one, or the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist; a missing default file means
    /// every value takes its default.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(Path::new(p)),
            None => {
                let default = Self::default_path()?;
                if default.exists() {
                    Self::load_from(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub github_token: Option<String>,
    pub llm_api_key: Option<String>,
    pub github_api_url: Option<String>,
    pub llm_api_url: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

/// Fully resolved settings, created once per command
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub github_token: Option<String>,
    pub llm_api_key: Option<String>,
    pub github_api_url: String,
    pub llm_api_url: String,
    /// `None` when no cache directory can be determined
    pub cache_dir: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub low_water_mark: u32,
    pub safety_margin: Duration,
    pub min_score: f64,
    pub limit: usize,
    pub extraction_delay: Duration,
    pub issues_file: PathBuf,
    pub repo_limit: usize,
    pub retry: RetryPolicy,
}

/// Treat blank strings (e.g. `GITHUB_TOKEN=`) as unset
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Merge overrides over a loaded config and validate the result.
    pub fn resolve(config: Config, config_path: PathBuf, overrides: Overrides) -> Result<Self> {
        let cache_dir = overrides
            .cache_dir
            .or(config.cache.dir)
            .or_else(|| crate::cache::CacheStorage::default_dir().ok());

        let settings = Self {
            config_path,
            github_token: non_blank(overrides.github_token).or(non_blank(config.github_token)),
            llm_api_key: non_blank(overrides.llm_api_key).or(non_blank(config.llm_api_key)),
            github_api_url: non_blank(overrides.github_api_url)
                .or(config.github_api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            llm_api_url: non_blank(overrides.llm_api_url)
                .or(config.llm_api_url)
                .unwrap_or_else(|| DEFAULT_LLM_URL.to_string()),
            cache_dir,
            cache_ttl: Duration::from_secs(config.cache.ttl_secs),
            low_water_mark: config.rate_limit.low_water_mark,
            safety_margin: Duration::from_secs(config.rate_limit.safety_margin_secs),
            min_score: config.recommend.min_score,
            limit: config.recommend.limit,
            extraction_delay: Duration::from_millis(config.recommend.extraction_delay_ms),
            issues_file: config.recommend.issues_file,
            repo_limit: config.recommend.repo_limit,
            retry: RetryPolicy {
                max_attempts: config.llm.max_attempts,
                max_backoff: Duration::from_secs(config.llm.max_backoff_secs),
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::Invalid("cache.ttl_secs must be positive".to_string()).into());
        }
        if !(0.0..=10.0).contains(&self.min_score) {
            return Err(ConfigError::Invalid(format!(
                "recommend.min_score must be between 0 and 10, got {}",
                self.min_score
            ))
            .into());
        }
        if self.limit == 0 {
            return Err(ConfigError::Invalid("recommend.limit must be positive".to_string()).into());
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("llm.max_attempts must be positive".to_string()).into());
        }
        Ok(())
    }

    /// GitHub token, required by every command that talks to GitHub
    pub fn require_github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingGitHubToken.into())
    }

    /// LLM key, required by `recommend` and `profile --assess`
    pub fn require_llm_api_key(&self) -> Result<&str> {
        self.llm_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingLlmApiKey.into())
    }
}
