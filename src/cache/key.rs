//! Cache key derivation
//!
//! Logical keys look like `repo_issues_facebook/react_30`. On disk they become
//! `<sanitized>-<hash>.json`: the sanitized part keeps files recognizable, the
//! SHA-256 prefix keeps keys that sanitize to the same string apart.

use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 digest appended to every file name
const HASH_PREFIX_LEN: usize = 16;

/// Keep only ASCII alphanumerics, `-` and `_`.
pub fn sanitize(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// File name (without directory) for a logical cache key
pub fn cache_file_name(key: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(key.as_bytes()));
    format!("{}-{}.json", sanitize(key), &digest[..HASH_PREFIX_LEN])
}

/// Builders for the logical keys used by the source client.
pub mod keys {
    pub fn user_data(username: &str) -> String {
        format!("user_data_{username}")
    }

    pub fn user_repos(username: &str, limit: usize) -> String {
        format!("user_repos_{username}_{limit}")
    }

    pub fn repo_issues(owner_repo: &str, limit: usize) -> String {
        format!("repo_issues_{owner_repo}_{limit}")
    }

    pub fn pinned_repos(username: &str) -> String {
        format!("pinned_repos_{username}")
    }

    pub fn profile_readme(username: &str) -> String {
        format!("profile_readme_{username}")
    }

    pub fn user_events(username: &str, limit: usize) -> String {
        format!("user_events_{username}_{limit}")
    }

    pub fn user_gists(username: &str) -> String {
        format!("user_gists_{username}")
    }

    pub fn repo_languages(owner: &str, repo: &str) -> String {
        format!("repo_languages_{owner}_{repo}")
    }

    pub fn tech_stack(owner: &str, repo: &str) -> String {
        format!("tech_stack_{owner}_{repo}")
    }
}
