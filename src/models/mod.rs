//! Display models for CLI output
//!
//! Shaped GitHub data and recommendation results converted into
//! table/JSON-friendly rows.

pub mod display;

pub use display::{
    EventDisplay, IssueDisplay, RecommendationDisplay, RepoDisplay, SkillDisplay,
};
