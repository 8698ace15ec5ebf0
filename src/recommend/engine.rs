//! Issue ranking
//!
//! Candidates are processed one at a time. Each is normalized, its
//! requirements are extracted, then compared with the user's tech profile.
//! Any failure along the way drops that one issue and the batch carries on.

use std::cmp::Ordering;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use super::issues::{RawIssue, normalize};
use crate::client::models::Issue;
use crate::clock::Clock;
use crate::llm::{
    ExperienceMatch, MatchLevel, SkillComparator, SkillExtractor, SkillMatch, SkillRequirement,
};
use crate::profile::TechProfile;

/// Minimum score (0–10) a recommendation needs
pub const DEFAULT_MIN_SCORE: f64 = 3.0;

/// Number of recommendations returned
pub const DEFAULT_LIMIT: usize = 5;

/// Pause before each extraction call, to stay under the model's own rate limit
pub const DEFAULT_EXTRACTION_DELAY: Duration = Duration::from_secs(1);

/// Rescale a 0–100 percentage to a 0–10 score with one decimal
pub fn match_score(percentage: f64) -> f64 {
    percentage.round() / 10.0
}

/// Ranking parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub min_score: f64,
    pub limit: usize,
    pub extraction_delay: Duration,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            limit: DEFAULT_LIMIT,
            extraction_delay: DEFAULT_EXTRACTION_DELAY,
        }
    }
}

/// Skills an issue requires, as shown next to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredSkills {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub domain_knowledge: Vec<String>,
    pub experience_level: String,
}

impl From<&SkillRequirement> for RequiredSkills {
    fn from(req: &SkillRequirement) -> Self {
        Self {
            languages: req.required_languages.clone(),
            frameworks: req.required_frameworks.clone(),
            domain_knowledge: req.required_domain_knowledge.clone(),
            experience_level: req
                .experience_level
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// An issue that passed the score threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecommendation {
    pub repo_name: String,
    pub issue_number: u64,
    pub title: String,
    pub url: String,
    pub labels: Vec<String>,
    pub created_at: Option<String>,
    pub match_percentage: f64,
    pub match_score: f64,
    pub match_level: MatchLevel,
    pub experience_match: ExperienceMatch,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub required_skills: RequiredSkills,
}

impl RankedRecommendation {
    fn new(issue: Issue, required: &SkillRequirement, skill_match: SkillMatch) -> Self {
        Self {
            repo_name: issue.repo_name,
            issue_number: issue.number,
            title: issue.title,
            url: issue.url,
            labels: issue.labels,
            created_at: issue.created_at,
            match_percentage: skill_match.match_percentage,
            match_score: match_score(skill_match.match_percentage),
            match_level: skill_match.match_level,
            experience_match: skill_match.experience_match,
            matching_skills: skill_match.matching_skills,
            missing_skills: skill_match.missing_skills,
            required_skills: RequiredSkills::from(required),
        }
    }
}

/// Total order: percentage desc, matching-skill count desc, repository asc,
/// issue number asc.
pub fn rank_order(a: &RankedRecommendation, b: &RankedRecommendation) -> Ordering {
    b.match_percentage
        .total_cmp(&a.match_percentage)
        .then_with(|| b.matching_skills.len().cmp(&a.matching_skills.len()))
        .then_with(|| a.repo_name.cmp(&b.repo_name))
        .then_with(|| a.issue_number.cmp(&b.issue_number))
}

/// Drives extraction and comparison over candidate issues
pub struct Recommender<'a> {
    extractor: &'a dyn SkillExtractor,
    comparator: &'a dyn SkillComparator,
    clock: &'a dyn Clock,
    options: RankOptions,
}

impl<'a> Recommender<'a> {
    pub fn new(
        extractor: &'a dyn SkillExtractor,
        comparator: &'a dyn SkillComparator,
        clock: &'a dyn Clock,
        options: RankOptions,
    ) -> Self {
        Self {
            extractor,
            comparator,
            clock,
            options,
        }
    }

    /// Score one candidate. `None` when it cannot be analyzed or falls below the threshold.
    async fn evaluate(&self, tech: &TechProfile, raw: &RawIssue) -> Option<RankedRecommendation> {
        let issue = match normalize(raw) {
            Ok(issue) => issue,
            Err(e) => {
                warn!("Skipping issue: {}", e);
                return None;
            }
        };
        let label = format!("{}#{}", issue.repo_name, issue.number);

        if !self.options.extraction_delay.is_zero() {
            self.clock.sleep(self.options.extraction_delay).await;
        }
        let required = match self.extractor.extract_requirements(&issue).await {
            Ok(Some(required)) => required,
            Ok(None) => {
                debug!("Could not analyze {}", label);
                return None;
            }
            Err(e) => {
                warn!("Skipping {}: requirement extraction failed: {}", label, e);
                return None;
            }
        };

        let skill_match = match self.comparator.compare(tech, &required).await {
            Ok(Some(skill_match)) => skill_match,
            Ok(None) => {
                debug!("No comparison result for {}", label);
                return None;
            }
            Err(e) => {
                warn!("Skipping {}: skill comparison failed: {}", label, e);
                return None;
            }
        };

        // Threshold on the unrounded score so 29.9% stays out at a 3.0 minimum
        if skill_match.match_percentage / 10.0 < self.options.min_score {
            debug!(
                "{} below threshold ({:.1}%)",
                label, skill_match.match_percentage
            );
            return None;
        }

        Some(RankedRecommendation::new(issue, &required, skill_match))
    }

    /// Rank candidates against a tech profile and keep the best `limit`.
    pub async fn rank(&self, tech: &TechProfile, candidates: &[RawIssue]) -> Vec<RankedRecommendation> {
        let mut ranked = Vec::new();
        for raw in candidates {
            if let Some(recommendation) = self.evaluate(tech, raw).await {
                ranked.push(recommendation);
            }
        }

        ranked.sort_by(rank_order);
        ranked.truncate(self.options.limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::llm::fake::ScriptedSkills;
    use serde_json::json;

    fn candidate(repo: &str, number: u64, title: &str) -> RawIssue {
        RawIssue::new(repo, json!({"title": title, "number": number}))
    }

    fn no_delay() -> RankOptions {
        RankOptions {
            extraction_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    fn python_profile() -> TechProfile {
        let mut tech = TechProfile::default();
        tech.languages.insert("Python".to_string());
        tech
    }

    #[test]
    fn test_match_score_rounds_to_one_decimal() {
        assert_eq!(match_score(80.0), 8.0);
        assert_eq!(match_score(29.9), 3.0);
        assert_eq!(match_score(30.0), 3.0);
        assert_eq!(match_score(72.4), 7.2);
        assert_eq!(match_score(100.0), 10.0);
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let skills = ScriptedSkills::new()
            .requires("Issue A", "Python")
            .requires("Issue B", "Rust")
            .scores("Python", 80.0, &["Python"])
            .scores("Rust", 10.0, &[]);
        let clock = ManualClock::at_epoch(0);
        let recommender = Recommender::new(&skills, &skills, &clock, no_delay());

        let ranked = recommender
            .rank(
                &python_profile(),
                &[candidate("o/r", 1, "Issue A"), candidate("o/r", 2, "Issue B")],
            )
            .await;

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Issue A");
        assert_eq!(ranked[0].match_score, 8.0);
        assert_eq!(ranked[0].required_skills.languages, vec!["Python"]);
        assert_eq!(ranked[0].required_skills.experience_level, "unknown");
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        let skills = ScriptedSkills::new()
            .requires("below", "Go")
            .requires("exact", "Java")
            .scores("Go", 29.9, &[])
            .scores("Java", 30.0, &[]);
        let clock = ManualClock::at_epoch(0);
        let recommender = Recommender::new(&skills, &skills, &clock, no_delay());

        let ranked = recommender
            .rank(
                &TechProfile::default(),
                &[candidate("o/r", 1, "below"), candidate("o/r", 2, "exact")],
            )
            .await;

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "exact");
        assert_eq!(ranked[0].match_score, 3.0);
    }

    #[tokio::test]
    async fn test_ordering_tie_breaks() {
        let skills = ScriptedSkills::new()
            .requires("few", "A")
            .requires("many", "B")
            .requires("zeta", "C")
            .requires("alpha-2", "C")
            .requires("alpha-1", "C")
            .scores("A", 70.0, &["x"])
            .scores("B", 70.0, &["x", "y"])
            .scores("C", 90.0, &["x"]);
        let clock = ManualClock::at_epoch(0);
        let recommender = Recommender::new(
            &skills,
            &skills,
            &clock,
            RankOptions {
                limit: 10,
                ..no_delay()
            },
        );

        let ranked = recommender
            .rank(
                &TechProfile::default(),
                &[
                    candidate("o/r", 1, "few"),
                    candidate("o/r", 2, "many"),
                    candidate("z/z", 3, "zeta"),
                    candidate("a/a", 9, "alpha-2"),
                    candidate("a/a", 4, "alpha-1"),
                ],
            )
            .await;

        let titles: Vec<_> = ranked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha-1", "alpha-2", "zeta", "many", "few"]);
    }

    #[tokio::test]
    async fn test_order_is_independent_of_input_order() {
        let skills = ScriptedSkills::new()
            .requires("one", "A")
            .requires("two", "B")
            .requires("three", "C")
            .scores("A", 50.0, &["a"])
            .scores("B", 50.0, &["a"])
            .scores("C", 95.0, &[]);
        let clock = ManualClock::at_epoch(0);
        let recommender = Recommender::new(&skills, &skills, &clock, no_delay());

        let forward = [
            candidate("b/b", 1, "one"),
            candidate("a/a", 2, "two"),
            candidate("c/c", 3, "three"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = recommender.rank(&TechProfile::default(), &forward).await;
        let b = recommender.rank(&TechProfile::default(), &backward).await;
        assert_eq!(a, b);
        assert_eq!(a[0].title, "three");
        assert_eq!(a[1].repo_name, "a/a");
    }

    #[tokio::test]
    async fn test_truncates_after_full_sort() {
        let mut skills = ScriptedSkills::new();
        let mut candidates = Vec::new();
        let percentages = [40.0, 90.0, 35.0, 75.0, 60.0, 99.0, 50.0];
        for (i, pct) in percentages.iter().enumerate() {
            let title = format!("issue-{i}");
            let lang = format!("lang-{i}");
            skills = skills.requires(&title, &lang).scores(&lang, *pct, &[]);
            candidates.push(candidate("o/r", i as u64, &title));
        }
        let clock = ManualClock::at_epoch(0);
        let recommender = Recommender::new(&skills, &skills, &clock, no_delay());

        let ranked = recommender.rank(&TechProfile::default(), &candidates).await;

        let pcts: Vec<_> = ranked.iter().map(|r| r.match_percentage).collect();
        assert_eq!(pcts, vec![99.0, 90.0, 75.0, 60.0, 50.0]);
    }

    #[tokio::test]
    async fn test_bad_items_are_dropped_not_fatal() {
        let skills = ScriptedSkills::new()
            .requires("good", "Python")
            .unreadable("gibberish")
            .failing("network")
            .requires("no-compare", "Cobol")
            .incomparable("Cobol")
            .scores("Python", 64.0, &["Python"]);
        let clock = ManualClock::at_epoch(0);
        let recommender = Recommender::new(&skills, &skills, &clock, no_delay());

        let ranked = recommender
            .rank(
                &python_profile(),
                &[
                    RawIssue::new("o/r", json!({"title": "bad labels", "labels": 3})),
                    candidate("o/r", 1, "gibberish"),
                    candidate("o/r", 2, "network"),
                    candidate("o/r", 3, "no-compare"),
                    candidate("o/r", 4, "good"),
                ],
            )
            .await;

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "good");
        // The malformed record never reaches extraction
        assert_eq!(
            skills.extracted(),
            vec!["gibberish", "network", "no-compare", "good"]
        );
    }

    #[tokio::test]
    async fn test_delay_before_each_extraction() {
        let skills = ScriptedSkills::new();
        let clock = ManualClock::at_epoch(0);
        let recommender = Recommender::new(&skills, &skills, &clock, RankOptions::default());

        recommender
            .rank(
                &TechProfile::default(),
                &[candidate("o/r", 1, "a"), candidate("o/r", 2, "b")],
            )
            .await;

        assert_eq!(
            clock.sleeps(),
            vec![DEFAULT_EXTRACTION_DELAY, DEFAULT_EXTRACTION_DELAY]
        );
    }
}
