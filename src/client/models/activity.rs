//! Public activity models (events and gists)

use serde::{Deserialize, Serialize};

/// A public event, reduced to what describes the user's activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    /// Number of commits, for push events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<usize>,

    /// Action taken, for issue and pull request events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// A public gist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gist {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    /// File names in the gist
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}
