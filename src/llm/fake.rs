//! Scripted skill service for testing
//!
//! Requirements are scripted per issue title; comparisons are scripted per
//! the first required language of the requirement being compared.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    LlmResult, ProfileAssessment, SkillComparator, SkillExtractor, SkillMatch, SkillRequirement,
};
use crate::client::models::{Issue, Repository, UserProfile};
use crate::error::LlmError;
use crate::profile::TechProfile;

#[derive(Default)]
pub struct ScriptedSkills {
    requirements: HashMap<String, LlmResult<SkillRequirement>>,
    matches: HashMap<String, LlmResult<SkillMatch>>,
    /// Titles passed to `extract_requirements`, in call order
    extracted: Mutex<Vec<String>>,
}

impl ScriptedSkills {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue titled `title` requires `language`
    pub fn requires(mut self, title: &str, language: &str) -> Self {
        self.requirements.insert(
            title.to_string(),
            Ok(Some(SkillRequirement {
                required_languages: vec![language.to_string()],
                ..Default::default()
            })),
        );
        self
    }

    /// Extraction for `title` yields no usable answer
    pub fn unreadable(mut self, title: &str) -> Self {
        self.requirements.insert(title.to_string(), Ok(None));
        self
    }

    /// Extraction for `title` fails
    pub fn failing(mut self, title: &str) -> Self {
        self.requirements.insert(
            title.to_string(),
            Err(LlmError::Network("connection reset".to_string())),
        );
        self
    }

    /// Requirements on `language` score `percentage` with `matching` skills
    pub fn scores(mut self, language: &str, percentage: f64, matching: &[&str]) -> Self {
        self.matches.insert(
            language.to_string(),
            Ok(Some(SkillMatch {
                matching_skills: matching.iter().map(|s| s.to_string()).collect(),
                match_percentage: percentage,
                ..Default::default()
            })),
        );
        self
    }

    /// Comparison for requirements on `language` yields no usable answer
    pub fn incomparable(mut self, language: &str) -> Self {
        self.matches.insert(language.to_string(), Ok(None));
        self
    }

    pub fn extracted(&self) -> Vec<String> {
        self.extracted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SkillExtractor for ScriptedSkills {
    async fn extract_requirements(&self, issue: &Issue) -> LlmResult<SkillRequirement> {
        self.extracted.lock().unwrap().push(issue.title.clone());
        self.requirements
            .get(&issue.title)
            .cloned()
            .unwrap_or(Ok(None))
    }

    async fn assess_profile(
        &self,
        _profile: &UserProfile,
        _repositories: &[Repository],
    ) -> LlmResult<ProfileAssessment> {
        Ok(None)
    }
}

#[async_trait]
impl SkillComparator for ScriptedSkills {
    async fn compare(
        &self,
        _tech: &TechProfile,
        required: &SkillRequirement,
    ) -> LlmResult<SkillMatch> {
        let Some(language) = required.required_languages.first() else {
            return Ok(None);
        };
        self.matches.get(language).cloned().unwrap_or(Ok(None))
    }
}
