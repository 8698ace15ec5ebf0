//! Tech profile display model

use serde::Serialize;
use tabled::Tabled;

use crate::profile::TechProfile;

/// One category of a tech profile
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SkillDisplay {
    #[tabled(rename = "CATEGORY")]
    pub category: String,

    #[tabled(rename = "SKILLS")]
    pub skills: String,
}

impl SkillDisplay {
    /// One row per non-empty category, in a fixed order
    pub fn rows(tech: &TechProfile) -> Vec<Self> {
        [
            ("Languages", &tech.languages),
            ("Frameworks", &tech.frameworks),
            ("Tools", &tech.tools),
            ("Domains", &tech.domains),
        ]
        .into_iter()
        .filter(|(_, set)| !set.is_empty())
        .map(|(category, set)| Self {
            category: category.to_string(),
            skills: set.iter().cloned().collect::<Vec<_>>().join(", "),
        })
        .collect()
    }
}
