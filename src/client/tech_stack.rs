//! Technology detection from repository file listings
//!
//! Pure functions: the source client gathers the file list and manifest
//! contents, this module turns them into a [`TechStack`] of
//! technology → evidence paths.

use std::collections::{BTreeMap, BTreeSet};

use super::models::TechStack;

/// Root manifest whose dependencies identify JavaScript frameworks
pub const PACKAGE_JSON: &str = "package.json";

/// Root manifest of Dart / Flutter projects
pub const PUBSPEC_YAML: &str = "pubspec.yaml";

/// Path fragments marking vendored or generated files (matched lowercased)
const EXCLUDED_PATHS: [&str; 4] = ["node_modules/", "vendor/", "dist/", "build/"];

/// Technology → path substrings that indicate it (case-sensitive)
const TECH_INDICATORS: &[(&str, &[&str])] = &[
    (
        "JavaScript",
        &["package.json", ".eslintrc", ".babelrc", "webpack.config.js", ".js", ".jsx"],
    ),
    ("TypeScript", &["tsconfig.json", ".ts", ".tsx", "tslint.json"]),
    (
        "Python",
        &["requirements.txt", "setup.py", "Pipfile", "pyproject.toml", ".py"],
    ),
    ("Java", &["pom.xml", "build.gradle", ".java", "gradle.properties"]),
    ("Dart", &["pubspec.yaml", ".dart"]),
    (
        "Flutter",
        &["pubspec.yaml", "android/app/build.gradle", "ios/Runner.xcodeproj"],
    ),
    ("Docker", &["Dockerfile", "docker-compose.yml", ".dockerignore"]),
    ("React", &["package.json", ".jsx", ".tsx", "react", "react-dom"]),
    ("Vue.js", &["vue.config.js", ".vue"]),
    ("Angular", &["angular.json", ".angular-cli.json"]),
    ("Node.js", &["package.json", "server.js", "app.js", "index.js"]),
    ("Express", &["express", "routes/", "app.js"]),
    ("Django", &["manage.py", "wsgi.py", "asgi.py"]),
    ("Flask", &["requirements.txt", "app.py", "wsgi.py"]),
    (
        "Spring",
        &["pom.xml", "application.properties", "application.yml"],
    ),
    (
        "CSS",
        &[".scss", ".sass", ".less", ".css", "style.css", "tailwind.config.js"],
    ),
    ("HTML", &[".html", ".htm", "index.html"]),
    (
        "Mobile",
        &["android/", "ios/", "App.js", "MainActivity.java", "AppDelegate.swift"],
    ),
    (
        "Database",
        &["schema.sql", "migrations/", "models/", "repositories/"],
    ),
    (
        "Testing",
        &["test/", "tests/", "spec/", "__tests__/", "jest.config.js", "pytest.ini"],
    ),
];

/// Framework → `package.json` dependency names that imply it
const FRAMEWORK_DEPENDENCIES: &[(&str, &[&str])] = &[
    (
        "React",
        &["react", "react-dom", "create-react-app", "next", "gatsby"],
    ),
    ("Vue.js", &["vue", "@vue/cli", "nuxt"]),
    ("Angular", &["@angular/core", "@angular/cli"]),
    ("Express", &["express"]),
    ("Next.js", &["next"]),
    ("Gatsby", &["gatsby"]),
    ("NestJS", &["@nestjs/core"]),
    ("Flutter", &["flutter"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("Spring", &["spring-boot", "spring-core"]),
    ("Mobile", &["react-native", "ionic", "cordova", "capacitor"]),
];

/// Whether a file path lies under a dependency or build directory
pub fn is_excluded_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    EXCLUDED_PATHS.iter().any(|p| lower.contains(p))
}

/// Whether a directory should be skipped when walking the contents API
pub fn is_excluded_dir(path: &str) -> bool {
    let lower = path.to_lowercase();
    EXCLUDED_PATHS
        .iter()
        .any(|p| lower.contains(p.trim_end_matches('/')))
}

/// Dependency names declared in a `package.json` (runtime and dev).
///
/// Returns `None` when the manifest is not valid JSON.
pub fn package_dependencies(package_json: &str) -> Option<BTreeSet<String>> {
    let manifest: serde_json::Value = serde_json::from_str(package_json).ok()?;
    let mut deps = BTreeSet::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(map) = manifest.get(section).and_then(|v| v.as_object()) {
            deps.extend(map.keys().cloned());
        }
    }
    Some(deps)
}

/// Manifest contents fetched for the repository, when present
#[derive(Debug, Default)]
pub struct Manifests {
    /// Dependency names from a root `package.json`
    pub package_dependencies: Option<BTreeSet<String>>,
    /// Raw text of a root `pubspec.yaml`
    pub pubspec: Option<String>,
}

/// Detect technologies from a filtered file list and manifest signals.
///
/// Evidence lists are deduplicated and sorted.
pub fn detect(files: &[String], manifests: &Manifests) -> TechStack {
    let mut detected: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut flag = |tech: &str, evidence: &str| {
        detected
            .entry(tech.to_string())
            .or_default()
            .insert(evidence.to_string());
    };

    if let Some(deps) = &manifests.package_dependencies {
        for (framework, names) in FRAMEWORK_DEPENDENCIES {
            if names.iter().any(|n| deps.contains(*n)) {
                flag(framework, PACKAGE_JSON);
            }
        }
        if !deps.is_empty() {
            flag("Node.js", PACKAGE_JSON);
        }
    }

    if let Some(pubspec) = &manifests.pubspec {
        if pubspec.contains("flutter:") {
            flag("Flutter", PUBSPEC_YAML);
        }
        flag("Dart", PUBSPEC_YAML);
    }

    for (tech, indicators) in TECH_INDICATORS {
        for file in files {
            if indicators.iter().any(|i| file.contains(i)) {
                flag(tech, file);
            }
        }
    }

    detected
        .into_iter()
        .map(|(tech, evidence)| (tech, evidence.into_iter().collect()))
        .collect()
}
