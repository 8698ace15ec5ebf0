//! Skill extraction and comparison through a language model
//!
//! The recommendation engine talks to two collaborators: a
//! [`SkillExtractor`] turning issue text into a [`SkillRequirement`], and a
//! [`SkillComparator`] scoring a [`TechProfile`] against it. [`GeminiClient`]
//! implements both over the Gemini `generateContent` endpoint.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::client::models::{Issue, Repository, UserProfile};
use crate::error::LlmError;
use crate::profile::TechProfile;

#[cfg(test)]
pub mod fake;
pub mod gemini;
pub mod prompts;
pub mod response;
pub mod retry;

pub use gemini::GeminiClient;
pub use retry::RetryPolicy;

/// Outcome of one model call: `Ok(None)` means the model gave no usable answer
pub type LlmResult<T> = Result<Option<T>, LlmError>;

/// A structured answer the model is asked for.
///
/// An answer counts only when at least one of [`KEYS`](Self::KEYS) is
/// present and non-null; every field is defaulted, so `{}` would otherwise
/// decode to an empty but "successful" value.
pub trait ModelAnswer: DeserializeOwned {
    const KEYS: &'static [&'static str];
}

/// Skills an issue asks for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillRequirement {
    #[serde(deserialize_with = "lenient_strings")]
    pub required_languages: Vec<String>,

    #[serde(deserialize_with = "lenient_strings")]
    pub required_frameworks: Vec<String>,

    #[serde(deserialize_with = "lenient_strings")]
    pub required_domain_knowledge: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
}

impl ModelAnswer for SkillRequirement {
    const KEYS: &'static [&'static str] = &[
        "required_languages",
        "required_frameworks",
        "required_domain_knowledge",
        "experience_level",
    ];
}

/// Qualitative match between a user and an issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchLevel {
    Strong,
    Partial,
    Weak,
    #[default]
    Unknown,
}

impl MatchLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLevel::Strong => "Strong Match",
            MatchLevel::Partial => "Partial Match",
            MatchLevel::Weak => "Weak Match",
            MatchLevel::Unknown => "unknown",
        }
    }

    /// Parse the model's wording, e.g. "Strong Match" or "partial"
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("strong") {
            MatchLevel::Strong
        } else if lower.contains("partial") {
            MatchLevel::Partial
        } else if lower.contains("weak") {
            MatchLevel::Weak
        } else {
            MatchLevel::Unknown
        }
    }
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MatchLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(MatchLevel::parse).unwrap_or_default())
    }
}

/// How the user's experience compares with what the issue needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExperienceMatch {
    Meets,
    Below,
    Exceeds,
    #[default]
    Unknown,
}

impl ExperienceMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceMatch::Meets => "Meets Requirements",
            ExperienceMatch::Below => "Below Requirements",
            ExperienceMatch::Exceeds => "Exceeds Requirements",
            ExperienceMatch::Unknown => "Unknown",
        }
    }

    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("below") {
            ExperienceMatch::Below
        } else if lower.contains("exceed") && !lower.contains("meet") {
            ExperienceMatch::Exceeds
        } else if lower.contains("meet") {
            ExperienceMatch::Meets
        } else {
            ExperienceMatch::Unknown
        }
    }
}

impl fmt::Display for ExperienceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExperienceMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExperienceMatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(ExperienceMatch::parse)
            .unwrap_or_default())
    }
}

/// Comparison of a user's skills with an issue's requirements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillMatch {
    #[serde(deserialize_with = "lenient_strings")]
    pub matching_skills: Vec<String>,

    #[serde(deserialize_with = "lenient_strings")]
    pub missing_skills: Vec<String>,

    /// 0–100
    #[serde(deserialize_with = "lenient_percentage")]
    pub match_percentage: f64,

    pub match_level: MatchLevel,

    pub experience_match: ExperienceMatch,
}

/// Without a percentage there is nothing to rank on
impl ModelAnswer for SkillMatch {
    const KEYS: &'static [&'static str] = &["match_percentage"];
}

/// Model assessment of a user's overall skills
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileAssessment {
    #[serde(deserialize_with = "lenient_strings")]
    pub primary_languages: Vec<String>,

    #[serde(deserialize_with = "lenient_strings")]
    pub frameworks: Vec<String>,

    #[serde(deserialize_with = "lenient_strings")]
    pub tools: Vec<String>,

    #[serde(deserialize_with = "lenient_strings")]
    pub domains: Vec<String>,

    /// Skill → beginner / intermediate / advanced
    pub skill_levels: BTreeMap<String, String>,
}

impl ModelAnswer for ProfileAssessment {
    const KEYS: &'static [&'static str] = &[
        "primary_languages",
        "frameworks",
        "tools",
        "domains",
        "skill_levels",
    ];
}

/// Accept a list of strings, a single string, or null
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

/// Accept `85.5`, `"85.5"` or `"85.5%"`, clamped to 0–100
fn lenient_percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let pct = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    })
}

/// Turns free text into structured skills
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    /// Skills required to work on an issue
    async fn extract_requirements(&self, issue: &Issue) -> LlmResult<SkillRequirement>;

    /// Overall skill assessment of a user from their profile and repositories
    async fn assess_profile(
        &self,
        profile: &UserProfile,
        repositories: &[Repository],
    ) -> LlmResult<ProfileAssessment>;
}

/// Scores a user's skills against an issue's requirements
#[async_trait]
pub trait SkillComparator: Send + Sync {
    async fn compare(&self, tech: &TechProfile, required: &SkillRequirement)
    -> LlmResult<SkillMatch>;
}
