//! Display model implementations for table and JSON output
//!
//! Display models transform data types into CLI-friendly formats with
//! appropriate column names and serialization.

mod activity;
mod issue;
mod recommendation;
mod repo;
mod skill;

pub use activity::EventDisplay;
pub use issue::IssueDisplay;
pub use recommendation::RecommendationDisplay;
pub use repo::RepoDisplay;
pub use skill::SkillDisplay;
