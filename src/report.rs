// src/report.rs
//! Parsing of the semi-structured markdown report an AI source returns:
//! the contact table, the email cells worth keeping, and the cited
//! sources. Malformed input always degrades to "no table found".

use crate::extractor::validator::is_valid_email;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    pub name: String,
    pub url: String,
}

/// Parse the first markdown table in `text`. Tolerates divider rows,
/// ragged rows (padded or truncated to header width) and outer pipe
/// delimiters. Returns None — never an error — when fewer than two usable
/// lines remain or every data row is empty.
pub fn parse_table(text: &str) -> Option<ReportTable> {
    let table_lines: Vec<&str> = text
        .lines()
        .filter(|line| line.contains('|') && !line.contains("---") && !line.trim().is_empty())
        .collect();

    if table_lines.len() < 2 {
        return None;
    }

    let headers: Vec<String> = split_cells(table_lines[0]);
    if headers.is_empty() {
        return None;
    }

    let mut rows = Vec::new();
    for line in &table_lines[1..] {
        let mut cells = split_cells(line);
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    if rows.is_empty() {
        return None;
    }

    Some(ReportTable { headers, rows })
}

/// Split a table line on pipes, trim every cell, and drop the empty edge
/// cells produced by leading/trailing delimiters.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells: Vec<String> = line.split('|').map(|cell| cell.trim().to_string()).collect();
    while cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

/// Validated emails out of every column whose header mentions "email".
/// Cells the model marked "(estimated)" are guesses and are skipped.
pub fn extract_report_emails(table: &ReportTable) -> Vec<String> {
    let email_columns: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.to_lowercase().contains("email"))
        .map(|(index, _)| index)
        .collect();

    let mut emails = Vec::new();
    for row in &table.rows {
        for &column in &email_columns {
            let Some(cell) = row.get(column) else { continue };
            if cell.contains('@') && !cell.contains("(estimated)") {
                let email = cell.trim().to_lowercase();
                if is_valid_email(&email) && !emails.contains(&email) {
                    emails.push(email);
                }
            }
        }
    }
    emails
}

/// Markdown links cited in the report body, kept as research sources.
pub fn extract_citations(text: &str) -> Vec<Citation> {
    let link_regex = Regex::new(r"\[([^\]]+)\]\((https?://[^\)]+)\)").unwrap();
    link_regex
        .captures_iter(text)
        .map(|captures| Citation {
            name: captures[1].to_string(),
            url: captures[2].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_with_divider_and_outer_pipes() {
        let text = "\
| Name | Role | Email |
|------|------|-------|
| John Smith | CEO | j.smith@acme.com |
| | General | info@acme.de |";
        let table = parse_table(text).unwrap();
        assert_eq!(table.headers, vec!["Name", "Role", "Email"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], "j.smith@acme.com");
        // A leading empty cell is trimmed with the delimiter and the row
        // padded back out on the right.
        assert_eq!(table.rows[1], vec!["General", "info@acme.de", ""]);
    }

    #[test]
    fn malformed_row_is_padded_not_dropped() {
        let text = "\
| Name | Role | Email |
| Jane Doe | HR Director |
| Extra | Cells | here@acme.com | overflow |";
        let table = parse_table(text).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Jane Doe", "HR Director", ""]);
        // Too-wide rows truncate to header width.
        assert_eq!(table.rows[1], vec!["Extra", "Cells", "here@acme.com"]);
    }

    #[test]
    fn rows_with_no_content_are_dropped() {
        let text = "\
| Name | Email |
|   |   |
| John | john@acme.com |";
        let table = parse_table(text).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn absent_when_too_little_or_nothing_usable() {
        assert!(parse_table("no table here at all").is_none());
        assert!(parse_table("| only | a | header |").is_none());
        assert!(parse_table("| a | b |\n|  |  |").is_none());
        assert!(parse_table("").is_none());
    }

    #[test]
    fn harvests_valid_emails_skipping_estimated() {
        let text = "\
| Name | Email | Phone |
| A | j.smith@acme.com | 1 |
| B | ceo@acme.com (estimated) | 2 |
| C | noreply@acme.com | 3 |
| D | not-an-email | 4 |";
        let table = parse_table(text).unwrap();
        assert_eq!(extract_report_emails(&table), vec!["j.smith@acme.com"]);
    }

    #[test]
    fn extracts_markdown_citations() {
        let text = "Found via [Company Site](https://acme.com/team) and \
            [Registry](http://registry.example.org/acme).";
        let citations = extract_citations(text);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].name, "Company Site");
        assert_eq!(citations[0].url, "https://acme.com/team");
    }
}
