//! Prompt templates

use crate::client::models::{Issue, Repository, UserProfile};
use crate::profile::TechProfile;

use super::SkillRequirement;

/// Appended to every prompt
pub const JSON_ONLY_SUFFIX: &str =
    "\nPlease respond with ONLY the JSON object, no markdown or other text.";

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}

pub fn issue_requirements(issue: &Issue) -> String {
    format!(
        r#"Analyze this GitHub issue and identify required skills:

Issue Title: {title}
Labels: {labels}
Description: {body}

Based on this information, create a JSON object detailing:
1. Required programming languages
2. Required frameworks and libraries
3. Required technical knowledge
4. Required experience level
5. Issue complexity and priority

Return a JSON object with these exact keys:
{{
  "required_languages": ["list of required programming languages"],
  "required_frameworks": ["list of required frameworks"],
  "required_domain_knowledge": ["list of required technical knowledge"],
  "experience_level": "beginner/intermediate/advanced",
  "priority": "low/medium/high",
  "complexity": "low/medium/high"
}}"#,
        title = issue.title,
        labels = issue.labels.join(", "),
        body = or_placeholder(issue.body.as_deref(), "No description provided"),
    )
}

pub fn compare_skills(tech: &TechProfile, required: &SkillRequirement) -> String {
    let user = serde_json::to_string_pretty(tech).unwrap_or_else(|_| "{}".to_string());
    let issue = serde_json::to_string_pretty(required).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"Compare these user skills and issue requirements:

User Skills:
{user}

Issue Requirements:
{issue}

Analyze the match and return a JSON object with these exact keys:
{{
  "matching_skills": ["list of skills the user has that match requirements"],
  "missing_skills": ["list of required skills the user is missing"],
  "match_percentage": 85.5,
  "match_level": "Strong Match/Partial Match/Weak Match",
  "experience_match": "Meets Requirements/Below Requirements/Exceeds Requirements"
}}"#
    )
}

pub fn assess_profile(profile: &UserProfile, repositories: &[Repository]) -> String {
    let repo_details: String = repositories
        .iter()
        .map(|repo| {
            format!(
                "\nRepository: {}\nDescription: {}\nLanguage: {}\nTopics: {}\nStars: {}\nForks: {}\n",
                repo.name,
                or_placeholder(repo.description.as_deref(), "No description"),
                or_placeholder(repo.language.as_deref(), "Not specified"),
                repo.topics.join(", "),
                repo.stars,
                repo.forks,
            )
        })
        .collect();

    let user = &profile.user;
    format!(
        r#"Analyze this GitHub user's profile and provide a detailed skill assessment:

User Profile:
- Username: {username}
- Public Repos: {public_repos}
- Bio: {bio}
- Location: {location}
- Company: {company}

Repository Information:
{repo_details}

Based on this information, create a JSON object with:
1. Primary programming languages they use
2. Frameworks and libraries they're familiar with
3. Development tools they use
4. Technical domains they work in
5. Skill levels for each identified skill

Return a JSON object with these exact keys:
{{
  "primary_languages": ["list of main programming languages"],
  "frameworks": ["list of frameworks and libraries"],
  "tools": ["list of development tools"],
  "domains": ["list of technical domains"],
  "skill_levels": {{"skill_name": "beginner/intermediate/advanced"}}
}}"#,
        username = profile.username,
        public_repos = user.public_repos,
        bio = or_placeholder(user.bio.as_deref(), "Not provided"),
        location = or_placeholder(user.location.as_deref(), "Not provided"),
        company = or_placeholder(user.company.as_deref(), "Not provided"),
    )
}
