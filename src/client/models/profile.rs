//! User identity and aggregated profile models

use serde::{Deserialize, Serialize};

use super::{Gist, PinnedRepository, UserEvent};

/// Basic identity fields of a GitHub user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub public_repos: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Everything known about a user's public footprint.
///
/// Built once per analysis and not modified afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,

    #[serde(flatten)]
    pub user: UserData,

    #[serde(default)]
    pub pinned_repositories: Vec<PinnedRepository>,

    #[serde(default)]
    pub profile_readme: Option<String>,

    #[serde(default)]
    pub recent_events: Vec<UserEvent>,

    #[serde(default)]
    pub gists: Vec<Gist>,
}
