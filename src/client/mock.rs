//! Mock GitHub API client for testing
//!
//! Provides a mock implementation of [`GitHubApi`] for unit testing
//! without making real API calls. Anything not configured answers
//! `ApiError::NotFound`, like GitHub does for a missing resource.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::models::{
    Gist, Issue, LanguageStats, PinnedRepository, RateLimitState, Repository, TreeEntry,
    UserData, UserEvent,
};
use super::{ApiResult, GitHubApi};
use crate::error::ApiError;

/// Configured responses, keyed by the call arguments
#[derive(Default)]
struct MockData {
    rate_limit: Option<RateLimitState>,
    users: HashMap<String, UserData>,
    repos: HashMap<String, Vec<Repository>>,
    topics: HashMap<String, Vec<String>>,
    issues: HashMap<String, Vec<Issue>>,
    languages: HashMap<String, LanguageStats>,
    trees: HashMap<String, Vec<TreeEntry>>,
    contents: HashMap<String, Vec<TreeEntry>>,
    files: HashMap<String, String>,
    readmes: HashMap<String, String>,
    events: HashMap<String, Vec<UserEvent>>,
    gists: HashMap<String, Vec<Gist>>,
    pinned: HashMap<String, Vec<PinnedRepository>>,
    /// Errors returned by every call of one method
    failures: HashMap<&'static str, ApiError>,
    /// Errors returned by the next call of one method only
    one_shot: HashMap<&'static str, ApiError>,
}

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockGitHubClient::new()
///     .with_user("octocat", UserData::default())
///     .await;
///
/// assert!(mock.get_user("octocat").await.is_ok());
/// assert_eq!(mock.call_counts().await.get_user, 1);
/// ```
#[derive(Default)]
pub struct MockGitHubClient {
    data: Arc<Mutex<MockData>>,
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub rate_limit: usize,
    pub get_user: usize,
    pub list_user_repos: usize,
    pub repo_topics: usize,
    pub list_repo_issues: usize,
    pub repo_languages: usize,
    pub repo_tree: usize,
    pub repo_contents: usize,
    pub file_content: usize,
    pub profile_readme: usize,
    pub user_events: usize,
    pub user_gists: usize,
    pub pinned_repositories: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.rate_limit
            + self.get_user
            + self.list_user_repos
            + self.repo_topics
            + self.list_repo_issues
            + self.repo_languages
            + self.repo_tree
            + self.repo_contents
            + self.file_content
            + self.profile_readme
            + self.user_events
            + self.user_gists
            + self.pinned_repositories
    }

    /// Calls that count against the quota, i.e. everything except the probe
    pub fn data_calls(&self) -> usize {
        self.total() - self.rate_limit
    }
}

fn not_found<T>(what: String) -> ApiResult<T> {
    Err(ApiError::NotFound(what))
}

impl MockGitHubClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the quota returned by `rate_limit`.
    /// Without one, the probe fails with a network error.
    pub async fn with_rate_limit(self, state: RateLimitState) -> Self {
        self.data.lock().await.rate_limit = Some(state);
        self
    }

    pub async fn with_user(self, username: &str, user: UserData) -> Self {
        self.data.lock().await.users.insert(username.to_string(), user);
        self
    }

    pub async fn with_repos(self, username: &str, repos: Vec<Repository>) -> Self {
        self.data.lock().await.repos.insert(username.to_string(), repos);
        self
    }

    pub async fn with_topics(self, owner_repo: &str, topics: &[&str]) -> Self {
        self.data.lock().await.topics.insert(
            owner_repo.to_string(),
            topics.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub async fn with_issues(self, owner_repo: &str, issues: Vec<Issue>) -> Self {
        self.data.lock().await.issues.insert(owner_repo.to_string(), issues);
        self
    }

    pub async fn with_languages(self, owner_repo: &str, stats: &[(&str, u64)]) -> Self {
        self.data.lock().await.languages.insert(
            owner_repo.to_string(),
            stats.iter().map(|(l, b)| (l.to_string(), *b)).collect(),
        );
        self
    }

    /// Configure the recursive tree of `owner/repo` at `branch`.
    pub async fn with_tree(self, owner_repo: &str, branch: &str, entries: Vec<TreeEntry>) -> Self {
        self.data
            .lock()
            .await
            .trees
            .insert(format!("{}@{}", owner_repo, branch), entries);
        self
    }

    /// Configure a contents listing (`path` is `""` for the root).
    pub async fn with_contents(self, owner_repo: &str, path: &str, entries: Vec<TreeEntry>) -> Self {
        self.data
            .lock()
            .await
            .contents
            .insert(format!("{}:{}", owner_repo, path), entries);
        self
    }

    pub async fn with_file(self, owner_repo: &str, path: &str, content: &str) -> Self {
        self.data
            .lock()
            .await
            .files
            .insert(format!("{}:{}", owner_repo, path), content.to_string());
        self
    }

    pub async fn with_readme(self, username: &str, readme: &str) -> Self {
        self.data
            .lock()
            .await
            .readmes
            .insert(username.to_string(), readme.to_string());
        self
    }

    pub async fn with_events(self, username: &str, events: Vec<UserEvent>) -> Self {
        self.data.lock().await.events.insert(username.to_string(), events);
        self
    }

    pub async fn with_gists(self, username: &str, gists: Vec<Gist>) -> Self {
        self.data.lock().await.gists.insert(username.to_string(), gists);
        self
    }

    pub async fn with_pinned(self, username: &str, pinned: Vec<PinnedRepository>) -> Self {
        self.data.lock().await.pinned.insert(username.to_string(), pinned);
        self
    }

    /// Make every call of `method` fail with `error`.
    pub async fn with_failure(self, method: &'static str, error: ApiError) -> Self {
        self.data.lock().await.failures.insert(method, error);
        self
    }

    /// Make the next call of `method` fail with `error`.
    /// Other methods, including the quota probe, are unaffected.
    pub async fn with_error(self, method: &'static str, error: ApiError) -> Self {
        self.data.lock().await.one_shot.insert(method, error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Record a call and return the configured error for it, if any.
    async fn check_error(&self, method: &'static str) -> ApiResult<()> {
        {
            let mut counts = self.call_count.lock().await;
            match method {
                "rate_limit" => counts.rate_limit += 1,
                "get_user" => counts.get_user += 1,
                "list_user_repos" => counts.list_user_repos += 1,
                "repo_topics" => counts.repo_topics += 1,
                "list_repo_issues" => counts.list_repo_issues += 1,
                "repo_languages" => counts.repo_languages += 1,
                "repo_tree" => counts.repo_tree += 1,
                "repo_contents" => counts.repo_contents += 1,
                "file_content" => counts.file_content += 1,
                "profile_readme" => counts.profile_readme += 1,
                "user_events" => counts.user_events += 1,
                "user_gists" => counts.user_gists += 1,
                "pinned_repositories" => counts.pinned_repositories += 1,
                other => panic!("unknown mock method {other}"),
            }
        }

        let mut data = self.data.lock().await;
        if let Some(e) = data.one_shot.remove(method) {
            return Err(e);
        }
        match data.failures.get(method) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GitHubApi for MockGitHubClient {
    async fn rate_limit(&self) -> ApiResult<RateLimitState> {
        self.check_error("rate_limit").await?;
        self.data
            .lock()
            .await
            .rate_limit
            .ok_or_else(|| ApiError::Network("no rate limit configured".to_string()))
    }

    async fn get_user(&self, username: &str) -> ApiResult<UserData> {
        self.check_error("get_user").await?;
        match self.data.lock().await.users.get(username) {
            Some(user) => Ok(user.clone()),
            None => not_found(format!("/users/{}", username)),
        }
    }

    async fn list_user_repos(&self, username: &str, limit: usize) -> ApiResult<Vec<Repository>> {
        self.check_error("list_user_repos").await?;
        match self.data.lock().await.repos.get(username) {
            Some(repos) => Ok(repos.iter().take(limit).cloned().collect()),
            None => not_found(format!("/users/{}/repos", username)),
        }
    }

    async fn repo_topics(&self, owner: &str, repo: &str) -> ApiResult<Vec<String>> {
        self.check_error("repo_topics").await?;
        let key = format!("{}/{}", owner, repo);
        match self.data.lock().await.topics.get(&key) {
            Some(topics) => Ok(topics.clone()),
            None => not_found(format!("/repos/{}/topics", key)),
        }
    }

    async fn list_repo_issues(&self, owner_repo: &str, limit: usize) -> ApiResult<Vec<Issue>> {
        self.check_error("list_repo_issues").await?;
        match self.data.lock().await.issues.get(owner_repo) {
            Some(issues) => Ok(issues.iter().take(limit).cloned().collect()),
            None => not_found(format!("/repos/{}/issues", owner_repo)),
        }
    }

    async fn repo_languages(&self, owner: &str, repo: &str) -> ApiResult<LanguageStats> {
        self.check_error("repo_languages").await?;
        let key = format!("{}/{}", owner, repo);
        match self.data.lock().await.languages.get(&key) {
            Some(stats) => Ok(stats.clone()),
            None => not_found(format!("/repos/{}/languages", key)),
        }
    }

    async fn repo_tree(&self, owner: &str, repo: &str, branch: &str) -> ApiResult<Vec<TreeEntry>> {
        self.check_error("repo_tree").await?;
        let key = format!("{}/{}@{}", owner, repo, branch);
        match self.data.lock().await.trees.get(&key) {
            Some(entries) => Ok(entries.clone()),
            None => not_found(format!("/repos/{}/{}/git/trees/{}", owner, repo, branch)),
        }
    }

    async fn repo_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> ApiResult<Vec<TreeEntry>> {
        self.check_error("repo_contents").await?;
        let key = format!("{}/{}:{}", owner, repo, path);
        match self.data.lock().await.contents.get(&key) {
            Some(entries) => Ok(entries.clone()),
            None => not_found(format!("/repos/{}/{}/contents/{}", owner, repo, path)),
        }
    }

    async fn file_content(&self, owner: &str, repo: &str, path: &str) -> ApiResult<String> {
        self.check_error("file_content").await?;
        let key = format!("{}/{}:{}", owner, repo, path);
        match self.data.lock().await.files.get(&key) {
            Some(content) => Ok(content.clone()),
            None => not_found(format!("/repos/{}/{}/contents/{}", owner, repo, path)),
        }
    }

    async fn profile_readme(&self, username: &str) -> ApiResult<String> {
        self.check_error("profile_readme").await?;
        match self.data.lock().await.readmes.get(username) {
            Some(readme) => Ok(readme.clone()),
            None => not_found(format!("/repos/{0}/{0}/readme", username)),
        }
    }

    async fn user_events(&self, username: &str, limit: usize) -> ApiResult<Vec<UserEvent>> {
        self.check_error("user_events").await?;
        match self.data.lock().await.events.get(username) {
            Some(events) => Ok(events.iter().take(limit).cloned().collect()),
            None => not_found(format!("/users/{}/events/public", username)),
        }
    }

    async fn user_gists(&self, username: &str) -> ApiResult<Vec<Gist>> {
        self.check_error("user_gists").await?;
        match self.data.lock().await.gists.get(username) {
            Some(gists) => Ok(gists.clone()),
            None => not_found(format!("/users/{}/gists", username)),
        }
    }

    async fn pinned_repositories(&self, username: &str) -> ApiResult<Vec<PinnedRepository>> {
        self.check_error("pinned_repositories").await?;
        match self.data.lock().await.pinned.get(username) {
            Some(pinned) => Ok(pinned.clone()),
            None => not_found(format!("pinned items for {}", username)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_user() {
        let mock = MockGitHubClient::new()
            .with_user(
                "octocat",
                UserData {
                    name: Some("The Octocat".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let user = mock.get_user("octocat").await.unwrap();
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
        assert!(mock.get_user("ghost").await.unwrap_err().is_not_found());

        let counts = mock.call_counts().await;
        assert_eq!(counts.get_user, 2);
        assert_eq!(counts.total(), 2);
    }

    #[tokio::test]
    async fn test_mock_one_shot_error() {
        let mock = MockGitHubClient::new()
            .with_gists("octocat", vec![])
            .await
            .with_error("user_gists", ApiError::Unauthorized)
            .await;

        assert!(matches!(mock.rate_limit().await, Err(ApiError::Network(_))));
        assert!(matches!(
            mock.user_gists("octocat").await,
            Err(ApiError::Unauthorized)
        ));
        assert!(mock.user_gists("octocat").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_persistent_failure() {
        let mock = MockGitHubClient::new()
            .with_failure("user_events", ApiError::ServerError("boom".to_string()))
            .await;

        for _ in 0..2 {
            assert!(matches!(
                mock.user_events("octocat", 5).await,
                Err(ApiError::ServerError(_))
            ));
        }
        assert_eq!(mock.call_counts().await.user_events, 2);
    }
}
