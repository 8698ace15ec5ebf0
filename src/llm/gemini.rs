//! Gemini `generateContent` client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::{Value, json};

use super::{
    LlmResult, ModelAnswer, ProfileAssessment, SkillComparator, SkillExtractor, SkillMatch, SkillRequirement,
    prompts, response, retry,
};
use super::retry::RetryPolicy;
use crate::client::models::{Issue, Repository, UserProfile};
use crate::clock::Clock;
use crate::error::LlmError;
use crate::profile::TechProfile;

/// Default generateContent endpoint
pub const DEFAULT_LLM_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Language-model client for skill extraction and comparison
pub struct GeminiClient {
    http: HttpClient,
    url: String,
    api_key: String,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        url: &str,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LlmError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: url.to_string(),
            api_key: api_key.into(),
            retry,
            clock,
        })
    }

    /// One POST, with the status mapped onto [`LlmError`]
    async fn post(&self, body: &Value) -> Result<Value, LlmError> {
        let response = self
            .http
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => response
                .json::<Value>()
                .await
                .map_err(|e| LlmError::InvalidResponse(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(LlmError::RateLimited { retry_after })
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(LlmError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    /// Send a prompt and decode the JSON object the model answers with.
    ///
    /// An object with none of the answer type's members is no result.
    async fn generate<T: ModelAnswer>(&self, prompt: String) -> LlmResult<T> {
        let text = prompt + prompts::JSON_ONLY_SUFFIX;
        let body = json!({
            "contents": [{
                "parts": [{ "text": text }]
            }]
        });

        debug!("LLM request ({} bytes of prompt)", text.len());
        let raw = retry::with_backoff(&self.retry, self.clock.as_ref(), || self.post(&body)).await?;

        let Some(answer) = response::extract_json(&raw) else {
            return Ok(None);
        };
        if !response::recognizes(&answer, T::KEYS) {
            warn!("LLM answer has none of the expected members: {}", answer);
            return Ok(None);
        }
        match serde_json::from_value(answer) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("LLM answer has an unexpected shape: {}", e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SkillExtractor for GeminiClient {
    async fn extract_requirements(&self, issue: &Issue) -> LlmResult<SkillRequirement> {
        self.generate(prompts::issue_requirements(issue)).await
    }

    async fn assess_profile(
        &self,
        profile: &UserProfile,
        repositories: &[Repository],
    ) -> LlmResult<ProfileAssessment> {
        self.generate(prompts::assess_profile(profile, repositories))
            .await
    }
}

#[async_trait]
impl SkillComparator for GeminiClient {
    async fn compare(
        &self,
        tech: &TechProfile,
        required: &SkillRequirement,
    ) -> LlmResult<SkillMatch> {
        self.generate(prompts::compare_skills(tech, required)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::llm::MatchLevel;

    fn client(server: &mockito::ServerGuard, clock: Arc<ManualClock>) -> GeminiClient {
        GeminiClient::new(
            "test-key",
            &format!("{}/v1beta/models/test:generateContent", server.url()),
            RetryPolicy::default(),
            clock,
        )
        .unwrap()
    }

    fn answer(text: &str) -> String {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string()
    }

    fn issue() -> Issue {
        Issue {
            number: 1,
            title: "Add Rust bindings".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_extract_requirements() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(mockito::Matcher::Regex("ONLY the JSON object".into()))
            .with_status(200)
            .with_body(answer(
                "```json\n{\"required_languages\": [\"Rust\"], \"experience_level\": \"intermediate\"}\n```",
            ))
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::at_epoch(0));
        let req = client(&server, clock)
            .extract_requirements(&issue())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(req.required_languages, vec!["Rust"]);
        assert_eq!(req.experience_level.as_deref(), Some("intermediate"));
    }

    #[tokio::test]
    async fn test_compare_skills() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(answer(
                r#"{"matching_skills":["Python"],"missing_skills":[],"match_percentage":80,"match_level":"Strong Match"}"#,
            ))
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::at_epoch(0));
        let result = client(&server, clock)
            .compare(&TechProfile::default(), &SkillRequirement::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.match_percentage, 80.0);
        assert_eq!(result.match_level, MatchLevel::Strong);
    }

    #[tokio::test]
    async fn test_non_json_answer_is_no_result() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(answer("Sorry, I can't help with that."))
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::at_epoch(0));
        let result = client(&server, clock)
            .extract_requirements(&issue())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_unrelated_object_is_no_requirement() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(answer(r#"{"answer": "I cannot tell"}"#))
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::at_epoch(0));
        let result = client(&server, clock)
            .extract_requirements(&issue())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_comparison_without_percentage_is_no_match() {
        let mut server = mockito::Server::new_async().await;
        let empty = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::Any)
            .match_body(mockito::Matcher::Regex("Compare these user skills".into()))
            .with_status(200)
            .with_body(answer("{}"))
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::at_epoch(0));
        let gemini = client(&server, clock);
        let result = gemini
            .compare(&TechProfile::default(), &SkillRequirement::default())
            .await
            .unwrap();
        assert!(result.is_none());
        empty.remove_async().await;

        let _partial = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(answer(r#"{"matching_skills": ["Rust"], "match_level": "Strong"}"#))
            .create_async()
            .await;
        let result = gemini
            .compare(&TechProfile::default(), &SkillRequirement::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_retries_with_retry_after() {
        let mut server = mockito::Server::new_async().await;
        let throttled = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_header("retry-after", "5")
            .expect(3)
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::at_epoch(0));
        let result = client(&server, clock.clone())
            .extract_requirements(&issue())
            .await;

        assert!(matches!(result, Err(LlmError::RateLimited { .. })));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(5), Duration::from_secs(5)]
        );
        throttled.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_error_fails_fast() {
        let mut server = mockito::Server::new_async().await;
        let bad = server
            .mock("POST", "/v1beta/models/test:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .expect(1)
            .create_async()
            .await;

        let clock = Arc::new(ManualClock::at_epoch(0));
        let result = client(&server, clock.clone())
            .extract_requirements(&issue())
            .await;

        assert!(matches!(result, Err(LlmError::Status { status: 400, .. })));
        assert!(clock.sleeps().is_empty());
        bad.assert_async().await;
    }
}
