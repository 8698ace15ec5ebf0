//! Repository display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::Repository;
use crate::output::formatters::truncate;

/// Repository display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RepoDisplay {
    #[tabled(rename = "REPO")]
    pub name: String,

    /// Primary language as reported by GitHub
    #[tabled(rename = "LANGUAGE")]
    pub language: String,

    #[tabled(rename = "STARS")]
    pub stars: u32,

    #[tabled(rename = "FORKS")]
    pub forks: u32,

    /// Top language shares, e.g. `Rust 92.1%, Shell 7.9%`
    #[tabled(rename = "LANGUAGES")]
    pub languages: String,

    /// Detected technologies
    #[tabled(rename = "TECH")]
    pub tech: String,
}

/// Language shares shown per repository
const MAX_LANGUAGES: usize = 3;

impl From<&Repository> for RepoDisplay {
    fn from(repo: &Repository) -> Self {
        let languages = repo
            .language_shares()
            .into_iter()
            .take(MAX_LANGUAGES)
            .map(|(lang, pct)| format!("{} {:.1}%", lang, pct))
            .collect::<Vec<_>>();

        let tech = repo
            .detected_tech_stack
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            name: repo.name.clone(),
            language: repo.language.clone().unwrap_or_else(|| "--".to_string()),
            stars: repo.stars,
            forks: repo.forks,
            languages: if languages.is_empty() {
                "--".to_string()
            } else {
                languages.join(", ")
            },
            tech: if tech.is_empty() {
                "--".to_string()
            } else {
                truncate(&tech, 60)
            },
        }
    }
}
