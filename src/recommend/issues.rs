//! Candidate issues: the pre-fetched issues file and record normalization
//!
//! The issues file maps `owner/repo` to a list of raw issue records. Records
//! come in two shapes: GraphQL style (`bodyText`, `createdAt`,
//! `labels.nodes[].name`) and REST style (`body`, `created_at`, `html_url`,
//! `labels[].name`). [`normalize`] accepts both, plus plain label strings.

use std::path::Path;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::client::models::Issue;
use crate::error::{Error, Result};

/// One issue record as found in the issues file, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct RawIssue {
    pub repo_name: String,
    pub record: Value,
}

impl RawIssue {
    pub fn new(repo_name: impl Into<String>, record: Value) -> Self {
        Self {
            repo_name: repo_name.into(),
            record,
        }
    }
}

impl From<&Issue> for RawIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            repo_name: issue.repo_name.clone(),
            record: serde_json::to_value(issue).unwrap_or(Value::Null),
        }
    }
}

/// Load every issue record from an issues file.
///
/// A missing file or invalid JSON means there is nothing to analyze; entries
/// whose value is not a list are skipped.
pub fn load_issues_file(path: &Path) -> Vec<RawIssue> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Issues file {} unavailable: {}", path.display(), e);
            return Vec::new();
        }
    };

    let by_repo: Map<String, Value> = match serde_json::from_str(&text) {
        Ok(map) => map,
        Err(e) => {
            warn!("Issues file {} is not a JSON object: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut issues = Vec::new();
    for (repo_name, records) in by_repo {
        match records {
            Value::Array(records) => {
                issues.extend(records.into_iter().map(|r| RawIssue::new(repo_name.clone(), r)));
            }
            _ => warn!("Skipping {}: issue list is not an array", repo_name),
        }
    }
    debug!("Loaded {} issues from {}", issues.len(), path.display());
    issues
}

fn malformed(repo_name: &str, what: impl std::fmt::Display) -> Error {
    Error::MalformedIssue(format!("{}: {}", repo_name, what))
}

/// First string-valued member among `names`
fn string_field(record: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| record.get(*name)?.as_str())
        .map(str::to_string)
}

/// Flatten labels given as strings, `{name}` objects or a `{nodes: [...]}` connection
fn label_names(repo_name: &str, labels: Option<&Value>) -> Result<Vec<String>> {
    let items = match labels {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(Value::Object(conn)) => match conn.get("nodes") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(_) => return Err(malformed(repo_name, "labels.nodes is not a list")),
        },
        Some(_) => return Err(malformed(repo_name, "labels is not a list")),
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(name) => Ok(name.clone()),
            Value::Object(label) => label
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| malformed(repo_name, "label without a name")),
            other => Err(malformed(repo_name, format!("unexpected label {}", other))),
        })
        .collect()
}

/// Normalize a raw record into an [`Issue`].
pub fn normalize(raw: &RawIssue) -> Result<Issue> {
    let repo_name = raw.repo_name.as_str();
    let Value::Object(record) = &raw.record else {
        return Err(malformed(repo_name, "record is not an object"));
    };

    let title = string_field(record, &["title"])
        .ok_or_else(|| malformed(repo_name, "missing title"))?;

    let number = match record.get("number") {
        None | Some(Value::Null) => 0,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| malformed(repo_name, format!("invalid number {}", value)))?,
    };

    let labels = label_names(repo_name, record.get("labels"))?;

    let url = string_field(record, &["url", "html_url"])
        .unwrap_or_else(|| format!("https://github.com/{}/issues/{}", repo_name, number));

    let comments = match record.get("comments") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(Value::Object(conn)) => conn
            .get("totalCount")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32,
        _ => 0,
    };

    Ok(Issue {
        repo_name: repo_name.to_string(),
        number,
        title,
        body: string_field(record, &["body", "bodyText"]),
        labels,
        url,
        created_at: string_field(record, &["createdAt", "created_at"]),
        updated_at: string_field(record, &["updatedAt", "updated_at"]),
        comments,
        assignee: None,
        state: string_field(record, &["state"]),
    })
}
