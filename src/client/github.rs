//! GitHub REST + GraphQL client implementation

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::models::{
    Gist, Issue, LanguageStats, PinnedRepository, RateLimitState, Repository, TreeEntry,
    UserData, UserEvent,
};
use super::{ApiResult, GitHubApi};
use crate::error::{ApiError, Result};

/// Default GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Client-side throttle, independent of the server quota.
/// Keeps bursts (e.g. per-repository enrichment) under GitHub's secondary limits.
const REQUESTS_PER_SECOND: NonZeroU32 = NonZeroU32::new(10).unwrap();

const PINNED_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    pinnedItems(first: 6, types: [REPOSITORY]) {
      nodes {
        ... on Repository {
          name
          description
          url
          languages(first: 5) { nodes { name } }
          repositoryTopics(first: 10) { nodes { topic { name } } }
        }
      }
    }
  }
}
"#;

/// GitHub API client
pub struct GitHubClient {
    http: HttpClient,
    base_url: String,
    token: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GitHubClient {
    /// Create a new GitHub client for the given base URL and bearer token
    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("skillmatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(REQUESTS_PER_SECOND))),
        })
    }

    fn build(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        self.send(path, self.build(Method::GET, path).query(query))
            .await
    }

    /// Send a request and map the response status onto [`ApiError`]
    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> ApiResult<T> {
        self.rate_limiter.until_ready().await;

        log::debug!("GitHub request: {}", path);
        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", path, e))),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => {
                if header_u64(&response, "x-ratelimit-remaining") == Some(0) {
                    let wait = header_u64(&response, "x-ratelimit-reset")
                        .map(|reset| (reset as i64 - Utc::now().timestamp()).max(0) as u64)
                        .unwrap_or(60);
                    return Err(ApiError::RateLimit(Duration::from_secs(wait)));
                }
                let msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Forbidden".to_string());
                Err(ApiError::Forbidden(msg))
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(path.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = header_u64(&response, "retry-after").unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(msg))
            }
            status if status.is_server_error() => {
                let msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(msg))
            }
            _ => Err(ApiError::InvalidResponse(format!(
                "Unexpected status code: {}",
                status
            ))),
        }
    }
}

fn header_u64(response: &reqwest::Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Contents API file payload
#[derive(Deserialize)]
struct ContentFile {
    #[serde(default)]
    content: String,
}

impl ContentFile {
    /// GitHub wraps base64 content at 60 columns
    fn decode(&self) -> ApiResult<String> {
        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| ApiError::InvalidResponse(format!("Invalid base64 content: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("Content is not UTF-8: {}", e)))
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn rate_limit(&self) -> ApiResult<RateLimitState> {
        #[derive(Deserialize)]
        struct Core {
            limit: u32,
            remaining: u32,
            reset: i64,
        }

        #[derive(Deserialize)]
        struct Resources {
            core: Core,
        }

        #[derive(Deserialize)]
        struct RateLimitResponse {
            resources: Resources,
        }

        let response: RateLimitResponse = self.get("/rate_limit", &[]).await?;
        let core = response.resources.core;
        let reset_at = DateTime::from_timestamp(core.reset, 0)
            .ok_or_else(|| ApiError::InvalidResponse("Invalid rate limit reset".to_string()))?;

        Ok(RateLimitState {
            limit: core.limit,
            remaining: core.remaining,
            reset_at,
        })
    }

    async fn get_user(&self, username: &str) -> ApiResult<UserData> {
        #[derive(Deserialize)]
        struct RawUser {
            name: Option<String>,
            bio: Option<String>,
            location: Option<String>,
            company: Option<String>,
            #[serde(default)]
            public_repos: u32,
            avatar_url: Option<String>,
            followers: Option<u32>,
            following: Option<u32>,
            created_at: Option<String>,
        }

        let raw: RawUser = self.get(&format!("/users/{}", username), &[]).await?;
        Ok(UserData {
            name: raw.name,
            bio: raw.bio,
            location: raw.location,
            company: raw.company,
            public_repos: raw.public_repos,
            avatar_url: raw.avatar_url,
            followers: raw.followers,
            following: raw.following,
            created_at: raw.created_at,
        })
    }

    async fn list_user_repos(&self, username: &str, limit: usize) -> ApiResult<Vec<Repository>> {
        #[derive(Deserialize)]
        struct RawRepo {
            name: String,
            description: Option<String>,
            language: Option<String>,
            #[serde(default)]
            stargazers_count: u32,
            #[serde(default)]
            forks_count: u32,
        }

        let raw: Vec<RawRepo> = self
            .get(
                &format!("/users/{}/repos", username),
                &[("sort", "updated".to_string()), ("per_page", limit.to_string())],
            )
            .await?;

        Ok(raw
            .into_iter()
            .map(|r| Repository {
                name: r.name,
                description: r.description,
                language: r.language,
                stars: r.stargazers_count,
                forks: r.forks_count,
                ..Default::default()
            })
            .collect())
    }

    async fn repo_topics(&self, owner: &str, repo: &str) -> ApiResult<Vec<String>> {
        #[derive(Deserialize)]
        struct TopicsResponse {
            #[serde(default)]
            names: Vec<String>,
        }

        let response: TopicsResponse = self
            .get(&format!("/repos/{}/{}/topics", owner, repo), &[])
            .await?;
        Ok(response.names)
    }

    async fn list_repo_issues(&self, owner_repo: &str, limit: usize) -> ApiResult<Vec<Issue>> {
        #[derive(Deserialize)]
        struct RawLabel {
            name: String,
        }

        #[derive(Deserialize)]
        struct RawLogin {
            login: String,
        }

        #[derive(Deserialize)]
        struct RawIssue {
            number: u64,
            title: String,
            body: Option<String>,
            #[serde(default)]
            labels: Vec<RawLabel>,
            html_url: Option<String>,
            created_at: Option<String>,
            updated_at: Option<String>,
            #[serde(default)]
            comments: u32,
            assignee: Option<RawLogin>,
            state: Option<String>,
        }

        let raw: Vec<RawIssue> = self
            .get(
                &format!("/repos/{}/issues", owner_repo),
                &[
                    ("state", "all".to_string()),
                    ("sort", "updated".to_string()),
                    ("per_page", limit.to_string()),
                ],
            )
            .await?;

        Ok(raw
            .into_iter()
            .map(|i| Issue {
                repo_name: owner_repo.to_string(),
                url: i
                    .html_url
                    .unwrap_or_else(|| format!("https://github.com/{}/issues/{}", owner_repo, i.number)),
                number: i.number,
                title: i.title,
                body: i.body,
                labels: i.labels.into_iter().map(|l| l.name).collect(),
                created_at: i.created_at,
                updated_at: i.updated_at,
                comments: i.comments,
                assignee: i.assignee.map(|a| a.login),
                state: i.state,
            })
            .collect())
    }

    async fn repo_languages(&self, owner: &str, repo: &str) -> ApiResult<LanguageStats> {
        self.get(&format!("/repos/{}/{}/languages", owner, repo), &[])
            .await
    }

    async fn repo_tree(&self, owner: &str, repo: &str, branch: &str) -> ApiResult<Vec<TreeEntry>> {
        #[derive(Deserialize)]
        struct TreeResponse {
            #[serde(default)]
            tree: Vec<TreeEntry>,
        }

        let response: TreeResponse = self
            .get(
                &format!("/repos/{}/{}/git/trees/{}", owner, repo, branch),
                &[("recursive", "1".to_string())],
            )
            .await?;
        Ok(response.tree)
    }

    async fn repo_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> ApiResult<Vec<TreeEntry>> {
        let api_path = if path.is_empty() {
            format!("/repos/{}/{}/contents", owner, repo)
        } else {
            format!("/repos/{}/{}/contents/{}", owner, repo, path)
        };
        self.get(&api_path, &[]).await
    }

    async fn file_content(&self, owner: &str, repo: &str, path: &str) -> ApiResult<String> {
        let file: ContentFile = self
            .get(&format!("/repos/{}/{}/contents/{}", owner, repo, path), &[])
            .await?;
        file.decode()
    }

    async fn profile_readme(&self, username: &str) -> ApiResult<String> {
        let file: ContentFile = self
            .get(&format!("/repos/{}/{}/readme", username, username), &[])
            .await?;
        file.decode()
    }

    async fn user_events(&self, username: &str, limit: usize) -> ApiResult<Vec<UserEvent>> {
        #[derive(Deserialize)]
        struct RepoRef {
            name: String,
        }

        #[derive(Deserialize)]
        struct RawEvent {
            #[serde(rename = "type")]
            event_type: String,
            repo: Option<RepoRef>,
            created_at: Option<String>,
            #[serde(default)]
            payload: serde_json::Value,
        }

        let raw: Vec<RawEvent> = self
            .get(
                &format!("/users/{}/events/public", username),
                &[("per_page", limit.to_string())],
            )
            .await?;

        Ok(raw
            .into_iter()
            .map(|e| {
                let (commits, action) = match e.event_type.as_str() {
                    "PushEvent" => (
                        Some(e.payload["commits"].as_array().map_or(0, Vec::len)),
                        None,
                    ),
                    "IssuesEvent" | "PullRequestEvent" => {
                        (None, e.payload["action"].as_str().map(str::to_string))
                    }
                    _ => (None, None),
                };
                UserEvent {
                    event_type: e.event_type,
                    repo: e.repo.map(|r| r.name),
                    created_at: e.created_at,
                    commits,
                    action,
                }
            })
            .collect())
    }

    async fn user_gists(&self, username: &str) -> ApiResult<Vec<Gist>> {
        #[derive(Deserialize)]
        struct RawGist {
            id: String,
            description: Option<String>,
            #[serde(default)]
            files: BTreeMap<String, serde_json::Value>,
            created_at: Option<String>,
            updated_at: Option<String>,
            html_url: Option<String>,
        }

        let raw: Vec<RawGist> = self.get(&format!("/users/{}/gists", username), &[]).await?;

        Ok(raw
            .into_iter()
            .map(|g| Gist {
                id: g.id,
                description: g.description,
                files: g.files.into_keys().collect(),
                created_at: g.created_at,
                updated_at: g.updated_at,
                url: g.html_url,
            })
            .collect())
    }

    async fn pinned_repositories(&self, username: &str) -> ApiResult<Vec<PinnedRepository>> {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }

        #[derive(Deserialize)]
        struct Nodes<T> {
            #[serde(default = "Vec::new")]
            nodes: Vec<Option<T>>,
        }

        #[derive(Deserialize)]
        struct TopicNode {
            topic: Named,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct PinnedNode {
            name: Option<String>,
            description: Option<String>,
            url: Option<String>,
            languages: Option<Nodes<Named>>,
            repository_topics: Option<Nodes<TopicNode>>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct GraphUser {
            pinned_items: Nodes<PinnedNode>,
        }

        #[derive(Deserialize)]
        struct GraphData {
            user: Option<GraphUser>,
        }

        #[derive(Deserialize)]
        struct GraphResponse {
            data: Option<GraphData>,
        }

        let body = serde_json::json!({
            "query": PINNED_QUERY,
            "variables": { "login": username },
        });
        let request = self.build(Method::POST, "/graphql").json(&body);
        let response: GraphResponse = self.send("/graphql", request).await?;

        let user = response
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| ApiError::NotFound(format!("pinned items for {}", username)))?;

        // Non-repository pinned items come back as empty objects without a name
        Ok(user
            .pinned_items
            .nodes
            .into_iter()
            .flatten()
            .filter_map(|node| {
                Some(PinnedRepository {
                    name: node.name?,
                    description: node.description,
                    url: node.url,
                    languages: node
                        .languages
                        .map(|l| l.nodes.into_iter().flatten().map(|n| n.name).collect())
                        .unwrap_or_default(),
                    topics: node
                        .repository_topics
                        .map(|t| t.nodes.into_iter().flatten().map(|n| n.topic.name).collect())
                        .unwrap_or_default(),
                })
            })
            .collect())
    }
}
