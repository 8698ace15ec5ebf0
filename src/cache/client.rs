//! Cache-first source client
//!
//! Wraps any [`GitHubApi`] with the disk cache and the rate-limit guard.
//! Every fetch checks the cache, then probes the quota, then calls upstream.
//! Failures never propagate: they come back as [`Fetched::Failed`] so one bad
//! resource leaves the rest of a profile intact.

use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::CacheStorage;
use crate::cache::keys;
use crate::client::models::{
    EntryKind, Gist, Issue, LanguageStats, PinnedRepository, Repository, TechStack, UserData,
    UserEvent, UserProfile,
};
use crate::client::tech_stack::{self, Manifests, PACKAGE_JSON, PUBSPEC_YAML};
use crate::client::{ApiResult, GitHubApi, RateLimitGuard};
use crate::error::ApiError;

/// Owner assumed when an issue source is given as a bare repository name
pub const DEFAULT_OWNER: &str = "facebook";

/// Events fetched for a user profile
pub const PROFILE_EVENT_LIMIT: usize = 30;

/// Branches tried for the recursive tree, in order
const TREE_BRANCHES: [&str; 2] = ["main", "master"];

/// Outcome of one source fetch
#[derive(Debug)]
pub enum Fetched<T> {
    /// Upstream (or the cache) returned data
    Found(T),
    /// Upstream answered that the resource does not exist
    Empty,
    /// The call failed; the error is kept for reporting
    Failed(ApiError),
}

impl<T> Fetched<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Empty | Fetched::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed(_))
    }

    /// The upstream error, if the fetch failed
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Fetched::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl<T: Default> Fetched<T> {
    /// The fetched value, or the empty value for missing/failed resources
    pub fn into_value(self) -> T {
        self.found().unwrap_or_default()
    }
}

/// Qualify a repository reference as `owner/repo`.
pub fn qualify_repo(repo: &str) -> String {
    if repo.contains('/') {
        repo.to_string()
    } else {
        format!("{}/{}", DEFAULT_OWNER, repo)
    }
}

/// Cache-first, quota-aware wrapper around a [`GitHubApi`] implementation.
///
/// The cache is optional (`None` for `--no-cache`).
pub struct SourceClient<A: GitHubApi> {
    inner: Arc<A>,
    cache: Option<CacheStorage>,
    guard: RateLimitGuard,
}

impl<A: GitHubApi> SourceClient<A> {
    pub fn new(inner: A, cache: Option<CacheStorage>, guard: RateLimitGuard) -> Self {
        Self {
            inner: Arc::new(inner),
            cache,
            guard,
        }
    }

    /// Get the inner client (for calls that bypass the cache, like `rate_limit`)
    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.cache.as_ref()?.get(key)
    }

    fn set_cached<T: Serialize>(&self, key: &str, value: &T) {
        if let Some(cache) = &self.cache
            && let Err(e) = cache.put(key, value)
        {
            warn!("Failed to cache {}: {}", key, e);
        }
    }

    /// Probe the quota, then run the call
    async fn guarded<T>(&self, call: impl Future<Output = ApiResult<T>>) -> ApiResult<T> {
        self.guard.ensure_capacity(self.inner.as_ref()).await;
        call.await
    }

    /// Cache-first fetch. Only successful answers are stored.
    async fn cached<T>(
        &self,
        key: &str,
        what: &str,
        fetch: impl Future<Output = ApiResult<T>>,
    ) -> Fetched<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(value) = self.get_cached(key) {
            debug!("Cache hit: {}", key);
            return Fetched::Found(value);
        }
        debug!("Cache miss: {}", key);

        match self.guarded(fetch).await {
            Ok(value) => {
                self.set_cached(key, &value);
                Fetched::Found(value)
            }
            Err(e) if e.is_not_found() => {
                debug!("No {} upstream: {}", what, e);
                Fetched::Empty
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", what, e);
                Fetched::Failed(e)
            }
        }
    }

    pub async fn user_data(&self, username: &str) -> Fetched<UserData> {
        self.cached(
            &keys::user_data(username),
            "user data",
            self.inner.get_user(username),
        )
        .await
    }

    /// Most recently updated repositories, each with its topics
    pub async fn user_repositories(&self, username: &str, limit: usize) -> Fetched<Vec<Repository>> {
        self.cached(
            &keys::user_repos(username, limit),
            "repositories",
            self.repositories_with_topics(username, limit),
        )
        .await
    }

    async fn repositories_with_topics(
        &self,
        username: &str,
        limit: usize,
    ) -> ApiResult<Vec<Repository>> {
        let mut repos = self.inner.list_user_repos(username, limit).await?;
        for repo in &mut repos {
            match self
                .guarded(self.inner.repo_topics(username, &repo.name))
                .await
            {
                Ok(topics) => repo.topics = topics,
                Err(e) => debug!("No topics for {}/{}: {}", username, repo.name, e),
            }
        }
        Ok(repos)
    }

    /// Issues of `owner/repo` (a bare name defaults to the `facebook` owner)
    pub async fn repo_issues(&self, repo: &str, limit: usize) -> Fetched<Vec<Issue>> {
        let owner_repo = qualify_repo(repo);
        self.cached(
            &keys::repo_issues(&owner_repo, limit),
            "issues",
            self.inner.list_repo_issues(&owner_repo, limit),
        )
        .await
    }

    pub async fn pinned_repositories(&self, username: &str) -> Fetched<Vec<PinnedRepository>> {
        self.cached(
            &keys::pinned_repos(username),
            "pinned repositories",
            self.inner.pinned_repositories(username),
        )
        .await
    }

    pub async fn profile_readme(&self, username: &str) -> Fetched<String> {
        self.cached(
            &keys::profile_readme(username),
            "profile README",
            self.inner.profile_readme(username),
        )
        .await
    }

    pub async fn user_events(&self, username: &str, limit: usize) -> Fetched<Vec<UserEvent>> {
        self.cached(
            &keys::user_events(username, limit),
            "events",
            self.inner.user_events(username, limit),
        )
        .await
    }

    pub async fn user_gists(&self, username: &str) -> Fetched<Vec<Gist>> {
        self.cached(
            &keys::user_gists(username),
            "gists",
            self.inner.user_gists(username),
        )
        .await
    }

    pub async fn repo_languages(&self, owner: &str, repo: &str) -> Fetched<LanguageStats> {
        self.cached(
            &keys::repo_languages(owner, repo),
            "repository languages",
            self.inner.repo_languages(owner, repo),
        )
        .await
    }

    pub async fn tech_stack(&self, owner: &str, repo: &str) -> Fetched<TechStack> {
        self.cached(
            &keys::tech_stack(owner, repo),
            "tech stack",
            self.detect_tech_stack(owner, repo),
        )
        .await
    }

    async fn detect_tech_stack(&self, owner: &str, repo: &str) -> ApiResult<TechStack> {
        let files = self.repository_files(owner, repo).await?;

        let mut manifests = Manifests::default();
        if files.iter().any(|f| f == PACKAGE_JSON) {
            match self
                .guarded(self.inner.file_content(owner, repo, PACKAGE_JSON))
                .await
            {
                Ok(text) => {
                    manifests.package_dependencies = tech_stack::package_dependencies(&text);
                    if manifests.package_dependencies.is_none() {
                        warn!("Unparseable package.json in {}/{}", owner, repo);
                    }
                }
                Err(e) => debug!("Could not read package.json in {}/{}: {}", owner, repo, e),
            }
        }
        if files.iter().any(|f| f == PUBSPEC_YAML) {
            match self
                .guarded(self.inner.file_content(owner, repo, PUBSPEC_YAML))
                .await
            {
                Ok(text) => manifests.pubspec = Some(text),
                Err(e) => debug!("Could not read pubspec.yaml in {}/{}: {}", owner, repo, e),
            }
        }

        Ok(tech_stack::detect(&files, &manifests))
    }

    /// File paths of a repository, minus vendored and build output.
    ///
    /// Tries the recursive tree of `main`, then `master` when `main` does not
    /// exist, then falls back to the contents API one directory level deep.
    async fn repository_files(&self, owner: &str, repo: &str) -> ApiResult<Vec<String>> {
        let mut tree = self.inner.repo_tree(owner, repo, TREE_BRANCHES[0]).await;
        if matches!(&tree, Err(e) if e.is_not_found()) {
            tree = self
                .guarded(self.inner.repo_tree(owner, repo, TREE_BRANCHES[1]))
                .await;
        }

        match tree {
            Ok(entries) => Ok(entries
                .into_iter()
                .filter(|e| e.kind == EntryKind::File && !tech_stack::is_excluded_path(&e.path))
                .map(|e| e.path)
                .collect()),
            Err(e) => {
                debug!("Tree unavailable for {}/{} ({}), listing contents", owner, repo, e);
                self.contents_files(owner, repo).await
            }
        }
    }

    async fn contents_files(&self, owner: &str, repo: &str) -> ApiResult<Vec<String>> {
        let root = self
            .guarded(self.inner.repo_contents(owner, repo, ""))
            .await?;

        let mut files = Vec::new();
        for entry in &root {
            if entry.kind == EntryKind::File && !tech_stack::is_excluded_path(&entry.path) {
                files.push(entry.path.clone());
            }
        }

        for dir in root
            .iter()
            .filter(|e| e.kind == EntryKind::Dir && !tech_stack::is_excluded_dir(&e.path))
        {
            match self
                .guarded(self.inner.repo_contents(owner, repo, &dir.path))
                .await
            {
                Ok(children) => files.extend(
                    children
                        .into_iter()
                        .filter(|c| c.kind == EntryKind::File)
                        .map(|c| c.path),
                ),
                Err(e) => debug!("Skipping {}/{}/{}: {}", owner, repo, dir.path, e),
            }
        }

        Ok(files)
    }

    /// Identity plus pinned repositories, README, recent events and gists.
    ///
    /// `None` when the user's identity cannot be fetched; the other parts
    /// degrade to empty individually.
    pub async fn user_profile(&self, username: &str) -> Option<UserProfile> {
        let user = match self.user_data(username).await {
            Fetched::Found(user) => user,
            Fetched::Empty => {
                debug!("User {} not found", username);
                return None;
            }
            Fetched::Failed(_) => return None,
        };

        Some(UserProfile {
            username: username.to_string(),
            user,
            pinned_repositories: self.pinned_repositories(username).await.into_value(),
            profile_readme: self.profile_readme(username).await.found(),
            recent_events: self
                .user_events(username, PROFILE_EVENT_LIMIT)
                .await
                .into_value(),
            gists: self.user_gists(username).await.into_value(),
        })
    }

    /// Repositories with language bytes and detected tech stack attached.
    ///
    /// Repositories are enriched one at a time, in list order. Those with no
    /// languages, no detected technology and no description are dropped.
    pub async fn enriched_repositories(&self, username: &str, limit: usize) -> Vec<Repository> {
        let repos = self.user_repositories(username, limit).await.into_value();

        let mut enriched = Vec::with_capacity(repos.len());
        for mut repo in repos {
            repo.language_stats = self.repo_languages(username, &repo.name).await.into_value();
            repo.detected_tech_stack = self.tech_stack(username, &repo.name).await.into_value();

            if repo.has_content() {
                enriched.push(repo);
            } else {
                debug!("Skipping repository without content: {}", repo.name);
            }
        }
        enriched
    }
}
