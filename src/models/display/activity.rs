//! Public activity display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::UserEvent;
use crate::output::formatters::format_date;

/// Recent event row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct EventDisplay {
    #[tabled(rename = "EVENT")]
    pub event_type: String,

    #[tabled(rename = "REPO")]
    pub repo: String,

    #[tabled(rename = "DETAIL")]
    pub detail: String,

    #[tabled(rename = "DATE")]
    pub date: String,
}

impl From<&UserEvent> for EventDisplay {
    fn from(event: &UserEvent) -> Self {
        let detail = match (&event.commits, &event.action) {
            (Some(1), _) => "1 commit".to_string(),
            (Some(n), _) => format!("{} commits", n),
            (None, Some(action)) => action.clone(),
            (None, None) => String::new(),
        };

        Self {
            event_type: event.event_type.trim_end_matches("Event").to_string(),
            repo: event.repo.clone().unwrap_or_else(|| "--".to_string()),
            detail,
            date: format_date(event.created_at.as_deref()),
        }
    }
}
