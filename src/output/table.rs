//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Shown in place of an empty listing
pub const NO_RESULTS: &str = "No results found.";

/// Format rows as a rounded table with centered headers
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    format_table_or(data, NO_RESULTS)
}

/// Like [`format_table`], with a caller-chosen line for an empty listing
pub fn format_table_or<T: Tabled>(data: &[T], empty: &str) -> String {
    if data.is_empty() {
        return empty.to_string();
    }

    Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct SkillRow {
        #[tabled(rename = "CATEGORY")]
        category: &'static str,
        #[tabled(rename = "SKILL")]
        skill: &'static str,
    }

    fn rows() -> Vec<SkillRow> {
        vec![
            SkillRow {
                category: "Languages",
                skill: "Rust",
            },
            SkillRow {
                category: "Tools",
                skill: "Docker",
            },
        ]
    }

    #[test]
    fn test_empty_listing() {
        let rows: Vec<SkillRow> = vec![];
        assert_eq!(format_table(&rows), NO_RESULTS);
        assert_eq!(format_table_or(&rows, "No skills detected"), "No skills detected");
    }

    #[test]
    fn test_headers_and_cells() {
        let result = format_table(&rows());

        assert!(result.contains("CATEGORY"));
        assert!(result.contains("SKILL"));
        assert!(result.contains("Rust"));
        assert!(result.contains("Docker"));
        assert!(result.starts_with('╭'));
        assert!(result.contains('╰'));
    }

    #[test]
    fn test_one_line_per_row() {
        let result = format_table_or(&rows(), "unused");
        // top border, header, separator, two rows, bottom border
        assert_eq!(result.lines().count(), 6);
    }
}
