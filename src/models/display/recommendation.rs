//! Recommendation display model

use serde::Serialize;
use tabled::Tabled;

use crate::output::formatters::{join_or_dash, truncate};
use crate::recommend::RankedRecommendation;

/// Ranked issue row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RecommendationDisplay {
    #[tabled(rename = "SCORE")]
    pub score: String,

    #[tabled(rename = "REPO")]
    pub repo: String,

    #[tabled(rename = "#")]
    pub number: u64,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "MATCH")]
    pub level: String,

    #[tabled(rename = "MATCHING")]
    pub matching: String,

    #[tabled(rename = "MISSING")]
    pub missing: String,
}

impl From<&RankedRecommendation> for RecommendationDisplay {
    fn from(rec: &RankedRecommendation) -> Self {
        Self {
            score: format!("{:.1}", rec.match_score),
            repo: rec.repo_name.clone(),
            number: rec.issue_number,
            title: truncate(&rec.title, 50),
            level: rec.match_level.to_string(),
            matching: truncate(&join_or_dash(&rec.matching_skills), 40),
            missing: truncate(&join_or_dash(&rec.missing_skills), 40),
        }
    }
}
