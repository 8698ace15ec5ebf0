//! Repository models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Technology name → evidence paths (deduplicated, sorted)
pub type TechStack = BTreeMap<String, Vec<String>>;

/// Language name → bytes of code
pub type LanguageStats = BTreeMap<String, u64>;

/// A user repository.
///
/// The list call fills the base fields; `language_stats` and
/// `detected_tech_stack` are added by the per-repository enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Primary language as reported by GitHub
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default)]
    pub stars: u32,

    #[serde(default)]
    pub forks: u32,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub language_stats: LanguageStats,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detected_tech_stack: TechStack,
}

impl Repository {
    /// Whether enrichment found anything worth analysing
    pub fn has_content(&self) -> bool {
        !self.language_stats.is_empty()
            || !self.detected_tech_stack.is_empty()
            || self.description.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Language shares as percentages, largest first
    pub fn language_shares(&self) -> Vec<(String, f64)> {
        let total: u64 = self.language_stats.values().sum();
        let mut shares: Vec<(String, f64)> = self
            .language_stats
            .iter()
            .map(|(lang, bytes)| {
                let pct = if total > 0 {
                    *bytes as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                (lang.clone(), pct)
            })
            .collect();
        shares.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        shares
    }
}

/// Pinned repository from the GraphQL profile query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRepository {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub topics: Vec<String>,
}

/// Kind of a git tree / contents entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file (`blob` in trees, `file` in contents listings)
    #[serde(alias = "blob")]
    File,
    /// Directory (`tree` in trees, `dir` in contents listings)
    #[serde(alias = "tree")]
    Dir,
    #[serde(other)]
    Other,
}

/// One path from a tree or contents listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Repository-relative path
    pub path: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_content() {
        let mut repo = Repository {
            name: "empty".to_string(),
            ..Default::default()
        };
        assert!(!repo.has_content());

        repo.description = Some(String::new());
        assert!(!repo.has_content());

        repo.description = Some("A web app".to_string());
        assert!(repo.has_content());

        let repo = Repository {
            name: "stats".to_string(),
            language_stats: LanguageStats::from([("Rust".to_string(), 10)]),
            ..Default::default()
        };
        assert!(repo.has_content());
    }

    #[test]
    fn test_language_shares() {
        let repo = Repository {
            name: "mixed".to_string(),
            language_stats: LanguageStats::from([
                ("Python".to_string(), 750),
                ("Shell".to_string(), 250),
            ]),
            ..Default::default()
        };

        let shares = repo.language_shares();
        assert_eq!(shares[0], ("Python".to_string(), 75.0));
        assert_eq!(shares[1], ("Shell".to_string(), 25.0));
    }

    #[test]
    fn test_entry_kind_accepts_tree_and_contents_names() {
        let blob: TreeEntry = serde_json::from_str(r#"{"path":"a.rs","type":"blob"}"#).unwrap();
        let file: TreeEntry = serde_json::from_str(r#"{"path":"a.rs","type":"file"}"#).unwrap();
        let dir: TreeEntry = serde_json::from_str(r#"{"path":"src","type":"dir"}"#).unwrap();
        let commit: TreeEntry =
            serde_json::from_str(r#"{"path":"sub","type":"commit"}"#).unwrap();

        assert_eq!(blob.kind, EntryKind::File);
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(dir.kind, EntryKind::Dir);
        assert_eq!(commit.kind, EntryKind::Other);
    }
}
