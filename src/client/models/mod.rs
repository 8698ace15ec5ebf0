//! GitHub data models
//!
//! These are the shaped forms of upstream responses: each fetch keeps only the
//! fields listed here and never passes the raw upstream schema through. They
//! are also the payloads written to the disk cache.

mod activity;
mod issue;
mod profile;
mod quota;
mod repo;

pub use activity::{Gist, UserEvent};
pub use issue::Issue;
pub use profile::{UserData, UserProfile};
pub use quota::RateLimitState;
pub use repo::{EntryKind, LanguageStats, PinnedRepository, Repository, TechStack, TreeEntry};
