//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod context;
pub mod issues;
pub mod profile;
pub mod rate_limit;
pub mod recommend;
pub mod repo;
pub mod skills;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// skillmatch - match a developer's GitHub footprint against open issues
#[derive(Parser, Debug)]
#[command(name = "skillmatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "SKILLMATCH_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "SKILLMATCH_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SKILLMATCH_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from GitHub
    #[arg(long, global = true, env = "SKILLMATCH_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// GitHub personal access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// API key for the language-model service
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Custom GitHub API base URL (GitHub Enterprise, testing)
    #[arg(long, global = true, env = "SKILLMATCH_GITHUB_API_URL", hide = true)]
    pub github_api_url: Option<String>,

    /// Custom language-model endpoint
    #[arg(long, global = true, env = "SKILLMATCH_LLM_API_URL", hide = true)]
    pub llm_api_url: Option<String>,

    /// Override cache directory
    #[arg(long, global = true, env = "SKILLMATCH_CACHE_DIR", hide_env = true)]
    pub cache_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show configuration and credential status
    Status,

    /// Display version information
    Version,

    /// Show a user's profile: identity, pinned repositories, activity
    #[command(after_help = "EXAMPLES:\n  \
            skillmatch profile octocat\n  \
            skillmatch profile octocat --assess      # Add a model-based skill assessment\n  \
            skillmatch profile octocat --format json")]
    Profile {
        /// GitHub username
        username: String,

        /// Ask the language model for an overall skill assessment
        #[arg(long)]
        assess: bool,

        /// Repositories considered for the assessment
        #[arg(long)]
        repo_limit: Option<usize>,
    },

    /// List a user's repositories with languages and detected tech stack
    #[command(visible_alias = "repositories")]
    Repos {
        /// GitHub username
        username: String,

        /// Maximum repositories to fetch (most recently updated first)
        #[arg(long, short = 'l')]
        limit: Option<usize>,
    },

    /// Show the tech profile derived from a user's GitHub footprint
    Skills {
        /// GitHub username
        username: String,

        /// Repositories analyzed
        #[arg(long)]
        repo_limit: Option<usize>,
    },

    /// List issues of a repository
    #[command(after_help = "EXAMPLES:\n  \
            skillmatch issues rust-lang/rust\n  \
            skillmatch issues react --limit 10     # Owner defaults to facebook")]
    Issues {
        /// Repository as owner/name (a bare name means facebook/<name>)
        repo: String,

        /// Maximum issues to fetch
        #[arg(long, short = 'l', default_value_t = 30)]
        limit: usize,
    },

    /// Rank open issues by how well they fit a user's skills
    #[command(after_help = "EXAMPLES:\n  \
            skillmatch recommend octocat                           # Issues from github_issues.json\n  \
            skillmatch recommend octocat --repo facebook/react     # Live issues of one repository\n  \
            skillmatch recommend octocat --issues-file issues.json --min-score 5 --limit 10")]
    Recommend {
        /// GitHub username
        username: String,

        /// Rank live issues of this repository instead of the issues file
        #[arg(long, conflicts_with = "issues_file")]
        repo: Option<String>,

        /// Pre-fetched issues file (owner/repo → list of issues)
        #[arg(long)]
        issues_file: Option<PathBuf>,

        /// Issues fetched from --repo
        #[arg(long, default_value_t = 30, requires = "repo")]
        issue_limit: usize,

        /// Number of recommendations to show
        #[arg(long, short = 'l')]
        limit: Option<usize>,

        /// Minimum match score (0-10)
        #[arg(long)]
        min_score: Option<f64>,

        /// Repositories analyzed to build the tech profile
        #[arg(long)]
        repo_limit: Option<usize>,
    },

    /// Show the remaining GitHub API quota
    RateLimit,

    /// Manage local response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
Install:
  bash:   skillmatch completion bash > /etc/bash_completion.d/skillmatch
  zsh:    skillmatch completion zsh > \"${fpath[1]}/_skillmatch\"
  fish:   skillmatch completion fish > ~/.config/fish/completions/skillmatch.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,
    /// Clear all cached data
    Clear,
    /// Print cache directory path
    Path,
}
