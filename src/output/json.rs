//! JSON output formatting
//!
//! Every command prints the same envelope: the payload under `data` and
//! provenance under `meta`, so scripts can tell which build produced it.

use chrono::Utc;
use serde::Serialize;

/// Envelope around a borrowed payload
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    /// RFC 3339 time the output was produced
    pub timestamp: String,

    pub version: &'static str,
}

impl Metadata {
    fn now() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl<'a, T: ?Sized> JsonOutput<'a, T> {
    pub fn new(data: &'a T) -> Self {
        Self {
            data,
            meta: Metadata::now(),
        }
    }
}

/// Format data as pretty-printed JSON inside the envelope
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Report {
        username: String,
        analyzed_issues: usize,
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_report_is_wrapped() {
        let report = Report {
            username: "octocat".to_string(),
            analyzed_issues: 12,
        };

        let value = parse(&format_json(&report).unwrap());
        assert_eq!(value["data"]["username"], "octocat");
        assert_eq!(value["data"]["analyzedIssues"], 12);
        assert_eq!(value["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(
            chrono::DateTime::parse_from_rfc3339(value["meta"]["timestamp"].as_str().unwrap())
                .is_ok()
        );
    }

    #[test]
    fn test_lists_keep_order_and_empty_stays_a_list() {
        let labels = ["bug", "good first issue", "help wanted"];
        let value = parse(&format_json(&labels[..]).unwrap());
        assert_eq!(value["data"], json!(["bug", "good first issue", "help wanted"]));

        let none: Vec<String> = Vec::new();
        let value = parse(&format_json(&none).unwrap());
        assert_eq!(value["data"], json!([]));
    }

    #[test]
    fn test_output_is_indented() {
        let text = format_json(&json!({"remaining": 4999})).unwrap();
        assert!(text.contains("\n  \"data\""));
    }
}
