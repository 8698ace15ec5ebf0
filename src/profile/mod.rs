//! Technology profile of a user
//!
//! [`build_tech_profile`] folds a user's pinned repositories, enriched
//! repositories and README into four sets of skills. It makes no network
//! calls and only ever adds to the sets.

pub mod rules;

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cache::SourceClient;
use crate::client::GitHubApi;
use crate::client::models::{Repository, UserProfile};

/// Skill category of a [`TechProfile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Languages,
    Frameworks,
    Tools,
    Domains,
}

/// Languages, frameworks, tools and domains of a user.
///
/// Sets serialize sorted; empty sets are left out of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechProfile {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub languages: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub frameworks: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tools: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub domains: BTreeSet<String>,
}

impl TechProfile {
    pub fn insert(&mut self, category: Category, value: impl Into<String>) {
        let set = match category {
            Category::Languages => &mut self.languages,
            Category::Frameworks => &mut self.frameworks,
            Category::Tools => &mut self.tools,
            Category::Domains => &mut self.domains,
        };
        set.insert(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
            && self.frameworks.is_empty()
            && self.tools.is_empty()
            && self.domains.is_empty()
    }

    /// Total number of skills across all categories
    pub fn len(&self) -> usize {
        self.languages.len() + self.frameworks.len() + self.tools.len() + self.domains.len()
    }
}

/// Build a technology profile from a user's profile and enriched repositories.
pub fn build_tech_profile(profile: &UserProfile, repositories: &[Repository]) -> TechProfile {
    let mut tech = TechProfile::default();

    for pinned in &profile.pinned_repositories {
        for language in &pinned.languages {
            tech.insert(Category::Languages, language.as_str());
        }
        for topic in &pinned.topics {
            let (category, value) = rules::classify_topic(topic);
            tech.insert(category, value);
        }
    }

    for repo in repositories {
        for language in repo.language_stats.keys() {
            tech.insert(Category::Languages, language.as_str());
        }
        if let Some(language) = &repo.language {
            tech.insert(Category::Languages, language.as_str());
        }
        for detected in repo.detected_tech_stack.keys() {
            tech.insert(rules::classify_detected(detected), detected.as_str());
        }
        if let Some(description) = &repo.description {
            for domain in rules::description_domains(description) {
                tech.insert(Category::Domains, domain);
            }
        }
    }

    if let Some(readme) = &profile.profile_readme {
        for (category, keyword) in rules::readme_mentions(readme) {
            tech.insert(category, keyword);
        }
    }

    tech
}

/// Everything gathered about a user for one analysis run
#[derive(Debug, Clone)]
pub struct UserAnalysis {
    pub profile: UserProfile,
    pub repositories: Vec<Repository>,
    pub tech: TechProfile,
}

/// Fetch a user's profile and repositories and build their tech profile.
///
/// `None` when the user cannot be found.
pub async fn analyze_user<A: GitHubApi>(
    source: &SourceClient<A>,
    username: &str,
    repo_limit: usize,
) -> Option<UserAnalysis> {
    let profile = source.user_profile(username).await?;
    let repositories = source.enriched_repositories(username, repo_limit).await;
    let tech = build_tech_profile(&profile, &repositories);

    debug!(
        "Tech profile for {}: {} skills from {} repositories",
        username,
        tech.len(),
        repositories.len()
    );

    Some(UserAnalysis {
        profile,
        repositories,
        tech,
    })
}
