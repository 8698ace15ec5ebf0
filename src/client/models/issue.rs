//! Issue models

use serde::{Deserialize, Serialize};

/// An issue shaped to the fields the recommendation pipeline uses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// `owner/repo` the issue belongs to
    #[serde(default)]
    pub repo_name: String,

    pub number: u64,

    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    /// Label names
    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub comments: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}
