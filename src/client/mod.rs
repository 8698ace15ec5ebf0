//! GitHub API client
//!
//! [`GitHubApi`] is the raw upstream surface: one method per REST/GraphQL call,
//! each returning a shaped model or an [`ApiError`](crate::error::ApiError).
//! It knows nothing about caching, quota or degradation; those live in
//! [`SourceClient`](crate::cache::SourceClient).

use async_trait::async_trait;

use crate::error::ApiError;

pub mod github;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod rate_limit;
pub mod tech_stack;

pub use github::GitHubClient;
#[cfg(test)]
pub use mock::MockGitHubClient;
pub use rate_limit::RateLimitGuard;

use models::{
    Gist, Issue, LanguageStats, PinnedRepository, RateLimitState, Repository, TreeEntry,
    UserData, UserEvent,
};

/// Result of a single upstream call
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// GitHub REST + GraphQL operations used by skillmatch
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Current core quota (`GET /rate_limit`)
    async fn rate_limit(&self) -> ApiResult<RateLimitState>;

    /// User identity (`GET /users/{username}`)
    async fn get_user(&self, username: &str) -> ApiResult<UserData>;

    /// Most recently updated repositories, without topics (`GET /users/{username}/repos`)
    async fn list_user_repos(&self, username: &str, limit: usize) -> ApiResult<Vec<Repository>>;

    /// Topic names of one repository (`GET /repos/{owner}/{repo}/topics`)
    async fn repo_topics(&self, owner: &str, repo: &str) -> ApiResult<Vec<String>>;

    /// Issues of a repository, any state, most recently updated first
    async fn list_repo_issues(&self, owner_repo: &str, limit: usize) -> ApiResult<Vec<Issue>>;

    /// Bytes of code per language (`GET /repos/{owner}/{repo}/languages`)
    async fn repo_languages(&self, owner: &str, repo: &str) -> ApiResult<LanguageStats>;

    /// Full recursive tree of a branch
    async fn repo_tree(&self, owner: &str, repo: &str, branch: &str) -> ApiResult<Vec<TreeEntry>>;

    /// Directory listing via the contents API (`""` is the repository root)
    async fn repo_contents(&self, owner: &str, repo: &str, path: &str)
    -> ApiResult<Vec<TreeEntry>>;

    /// Decoded text of one file via the contents API
    async fn file_content(&self, owner: &str, repo: &str, path: &str) -> ApiResult<String>;

    /// Decoded profile README (`{username}/{username}` repository)
    async fn profile_readme(&self, username: &str) -> ApiResult<String>;

    /// Recent public events
    async fn user_events(&self, username: &str, limit: usize) -> ApiResult<Vec<UserEvent>>;

    /// Public gists
    async fn user_gists(&self, username: &str) -> ApiResult<Vec<Gist>>;

    /// Pinned repositories (GraphQL)
    async fn pinned_repositories(&self, username: &str) -> ApiResult<Vec<PinnedRepository>>;
}
