//! Keyword tables used to classify technologies
//!
//! Each table is an ordered list of `(category, keywords)` rules checked top
//! to bottom; the first rule with a keyword contained in the lowercased input
//! wins.

use super::Category;

/// Topic rules for pinned repositories. Unmatched topics are domains.
const TOPIC_RULES: &[(Category, &[&str])] = &[
    (
        Category::Languages,
        &["javascript", "python", "java", "typescript", "ruby", "php"],
    ),
    (
        Category::Frameworks,
        &["react", "vue", "angular", "django", "flask", "spring", "express"],
    ),
    (
        Category::Tools,
        &["docker", "kubernetes", "aws", "git", "mongodb", "postgresql"],
    ),
];

/// Detected technologies that are frameworks
const DETECTED_FRAMEWORKS: &[&str] = &[
    "React", "Vue.js", "Angular", "Django", "Flask", "Spring", "Express",
];

/// Detected technologies that are infrastructure tools
const DETECTED_TOOLS: &[&str] = &["Docker", "Kubernetes", "Node.js", "MongoDB", "PostgreSQL"];

/// Domain label → description keywords. Every matching domain applies.
const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("web", &["web", "frontend", "backend", "fullstack"]),
    (
        "mobile",
        &["mobile", "android", "ios", "react-native", "flutter"],
    ),
    (
        "data science",
        &["data science", "machine learning", "deep learning", "ai"],
    ),
    ("devops", &["devops", "ci/cd", "docker", "kubernetes"]),
    ("blockchain", &["blockchain", "web3", "smart contract"]),
    ("security", &["security", "cryptography", "authentication"]),
];

/// README keywords per category. Every hit applies, capitalized.
const README_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Languages,
        &["javascript", "python", "java", "typescript", "ruby", "php", "c++", "c#"],
    ),
    (
        Category::Frameworks,
        &["react", "vue", "angular", "django", "flask", "spring", "express"],
    ),
    (
        Category::Tools,
        &["docker", "kubernetes", "aws", "git", "mongodb", "postgresql"],
    ),
];

/// Upper-case the first character and lower-case the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Classify a repository topic, returning the category and the value to record.
///
/// Language topics are recorded capitalized; everything else verbatim.
pub fn classify_topic(topic: &str) -> (Category, String) {
    let lower = topic.to_lowercase();
    for (category, keywords) in TOPIC_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            let value = if *category == Category::Languages {
                capitalize(topic)
            } else {
                topic.to_string()
            };
            return (*category, value);
        }
    }
    (Category::Domains, topic.to_string())
}

/// Classify a technology reported by tech-stack detection
pub fn classify_detected(tech: &str) -> Category {
    if DETECTED_FRAMEWORKS.contains(&tech) {
        Category::Frameworks
    } else if DETECTED_TOOLS.contains(&tech) {
        Category::Tools
    } else {
        Category::Languages
    }
}

/// Domains suggested by a repository description
pub fn description_domains(description: &str) -> impl Iterator<Item = &'static str> {
    let lower = description.to_lowercase();
    DOMAIN_KEYWORDS
        .iter()
        .filter(move |(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(domain, _)| *domain)
}

/// Technologies mentioned in a profile README
pub fn readme_mentions(readme: &str) -> Vec<(Category, String)> {
    let lower = readme.to_lowercase();
    README_KEYWORDS
        .iter()
        .flat_map(|(category, keywords)| {
            keywords
                .iter()
                .filter(|k| lower.contains(*k))
                .map(|k| (*category, capitalize(k)))
                .collect::<Vec<_>>()
        })
        .collect()
}
