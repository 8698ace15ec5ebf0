//! Issue recommendations for a user
//!
//! [`analyze`] is the top-level entry point: build the user's tech profile,
//! gather candidate issues, then hand both to the [`Recommender`].

pub mod engine;
pub mod issues;

use std::path::PathBuf;

use log::{debug, info};
use serde::Serialize;

pub use engine::{RankOptions, RankedRecommendation, Recommender};
pub use issues::{RawIssue, load_issues_file};

use crate::cache::SourceClient;
use crate::client::GitHubApi;
use crate::profile::{self, TechProfile};

/// Default bulk issues file, relative to the working directory
pub const DEFAULT_ISSUES_FILE: &str = "github_issues.json";

/// Where candidate issues come from
#[derive(Debug, Clone, PartialEq)]
pub enum IssueSource {
    /// Pre-fetched `owner/repo → [issue]` file
    File(PathBuf),
    /// Live issues of one repository
    Repository { repo: String, limit: usize },
}

impl IssueSource {
    /// Load raw candidates. A missing or unreadable source yields none.
    pub async fn load<A: GitHubApi>(&self, source: &SourceClient<A>) -> Vec<RawIssue> {
        match self {
            IssueSource::File(path) => load_issues_file(path),
            IssueSource::Repository { repo, limit } => source
                .repo_issues(repo, *limit)
                .await
                .into_value()
                .iter()
                .map(RawIssue::from)
                .collect(),
        }
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub username: String,
    pub tech_profile: TechProfile,
    pub analyzed_issues: usize,
    pub recommendations: Vec<RankedRecommendation>,
}

/// Rank candidate issues for `username`.
///
/// `None` when the user's profile cannot be fetched.
pub async fn analyze<A: GitHubApi>(
    source: &SourceClient<A>,
    recommender: &Recommender<'_>,
    username: &str,
    issues: &IssueSource,
    repo_limit: usize,
) -> Option<AnalysisReport> {
    let analysis = profile::analyze_user(source, username, repo_limit).await?;

    let candidates = issues.load(source).await;
    info!(
        "Analyzing {} candidate issues for {}",
        candidates.len(),
        username
    );

    let recommendations = recommender.rank(&analysis.tech, &candidates).await;
    debug!(
        "{} of {} issues recommended",
        recommendations.len(),
        candidates.len()
    );

    Some(AnalysisReport {
        username: username.to_string(),
        tech_profile: analysis.tech,
        analyzed_issues: candidates.len(),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::{Issue, RateLimitState, UserData};
    use crate::client::{MockGitHubClient, RateLimitGuard};
    use crate::clock::ManualClock;
    use crate::llm::fake::ScriptedSkills;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    const NOW: i64 = 1_700_000_000;

    fn quota() -> RateLimitState {
        RateLimitState {
            limit: 5000,
            remaining: 4000,
            reset_at: chrono::DateTime::from_timestamp(NOW + 600, 0).unwrap(),
        }
    }

    async fn octocat() -> MockGitHubClient {
        MockGitHubClient::new()
            .with_rate_limit(quota())
            .await
            .with_user(
                "octocat",
                UserData {
                    name: Some("The Octocat".to_string()),
                    ..Default::default()
                },
            )
            .await
            .with_readme("octocat", "I write Python every day")
            .await
    }

    fn options() -> RankOptions {
        RankOptions {
            extraction_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_from_issues_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("github_issues.json");
        std::fs::write(
            &path,
            json!({
                "psf/requests": [
                    {"title": "Issue A", "number": 1, "labels": {"nodes": [{"name": "bug"}]}},
                    {"title": "Issue B", "number": 2}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let clock = Arc::new(ManualClock::at_epoch(NOW));
        let source = SourceClient::new(
            octocat().await,
            None,
            RateLimitGuard::with_defaults(clock.clone()),
        );
        let skills = ScriptedSkills::new()
            .requires("Issue A", "Python")
            .requires("Issue B", "Rust")
            .scores("Python", 80.0, &["Python"])
            .scores("Rust", 10.0, &[]);
        let recommender = Recommender::new(&skills, &skills, clock.as_ref(), options());

        let report = analyze(&source, &recommender, "octocat", &IssueSource::File(path), 20)
            .await
            .unwrap();

        assert_eq!(report.username, "octocat");
        assert!(report.tech_profile.languages.contains("Python"));
        assert_eq!(report.analyzed_issues, 2);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].repo_name, "psf/requests");
        assert_eq!(report.recommendations[0].labels, vec!["bug"]);
        assert_eq!(report.recommendations[0].match_score, 8.0);
    }

    #[tokio::test]
    async fn test_analyze_live_repository_issues() {
        let clock = Arc::new(ManualClock::at_epoch(NOW));
        let mock = octocat()
            .await
            .with_issues(
                "facebook/react",
                vec![Issue {
                    repo_name: "facebook/react".to_string(),
                    number: 31,
                    title: "Port scheduler to Python".to_string(),
                    url: "https://github.com/facebook/react/issues/31".to_string(),
                    ..Default::default()
                }],
            )
            .await;
        let source = SourceClient::new(mock, None, RateLimitGuard::with_defaults(clock.clone()));
        let skills = ScriptedSkills::new()
            .requires("Port scheduler to Python", "Python")
            .scores("Python", 55.0, &["Python"]);
        let recommender = Recommender::new(&skills, &skills, clock.as_ref(), options());

        let issues = IssueSource::Repository {
            repo: "react".to_string(),
            limit: 30,
        };
        let report = analyze(&source, &recommender, "octocat", &issues, 20)
            .await
            .unwrap();

        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].issue_number, 31);
        assert_eq!(report.recommendations[0].match_score, 5.5);
    }

    #[tokio::test]
    async fn test_analyze_unknown_user_is_none() {
        let clock = Arc::new(ManualClock::at_epoch(NOW));
        let mock = MockGitHubClient::new().with_rate_limit(quota()).await;
        let source = SourceClient::new(mock, None, RateLimitGuard::with_defaults(clock.clone()));
        let skills = ScriptedSkills::new();
        let recommender = Recommender::new(&skills, &skills, clock.as_ref(), options());

        let report = analyze(
            &source,
            &recommender,
            "ghost",
            &IssueSource::File(PathBuf::from("does-not-exist.json")),
            20,
        )
        .await;

        assert!(report.is_none());
        assert!(skills.extracted().is_empty());
    }

    #[tokio::test]
    async fn test_missing_issues_file_reports_nothing_analyzed() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::at_epoch(NOW));
        let source = SourceClient::new(
            octocat().await,
            None,
            RateLimitGuard::with_defaults(clock.clone()),
        );
        let skills = ScriptedSkills::new();
        let recommender = Recommender::new(&skills, &skills, clock.as_ref(), options());

        let report = analyze(
            &source,
            &recommender,
            "octocat",
            &IssueSource::File(dir.path().join("absent.json")),
            20,
        )
        .await
        .unwrap();

        assert_eq!(report.analyzed_issues, 0);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = AnalysisReport {
            username: "octocat".to_string(),
            tech_profile: TechProfile::default(),
            analyzed_issues: 0,
            recommendations: Vec::new(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("techProfile").is_some());
        assert_eq!(value["analyzedIssues"], 0);
    }
}
