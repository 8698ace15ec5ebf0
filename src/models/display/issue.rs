//! Issue display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::Issue;
use crate::output::formatters::{format_date, join_or_dash, truncate};

/// Issue display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct IssueDisplay {
    #[tabled(rename = "#")]
    pub number: u64,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "STATE")]
    pub state: String,

    #[tabled(rename = "LABELS")]
    pub labels: String,

    #[tabled(rename = "COMMENTS")]
    pub comments: u32,

    #[tabled(rename = "CREATED")]
    pub created: String,
}

impl From<&Issue> for IssueDisplay {
    fn from(issue: &Issue) -> Self {
        Self {
            number: issue.number,
            title: truncate(&issue.title, 60),
            state: issue.state.clone().unwrap_or_else(|| "--".to_string()),
            labels: truncate(&join_or_dash(&issue.labels), 40),
            comments: issue.comments,
            created: format_date(issue.created_at.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = Issue {
            number: 42,
            title: "Crash when rendering nested portals".to_string(),
            labels: vec!["bug".to_string(), "good first issue".to_string()],
            comments: 4,
            state: Some("open".to_string()),
            ..Default::default()
        };

        let display = IssueDisplay::from(&issue);

        assert_eq!(display.number, 42);
        assert_eq!(display.state, "open");
        assert_eq!(display.labels, "bug, good first issue");
        assert_eq!(display.created, "N/A");
    }
}
