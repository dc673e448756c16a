//! Console rendering of validation reports.

use std::io::{self, Write};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hxl_validate::{Severity, ValidationIssue, ValidationReport};

/// Print the report as a table followed by a one-line verdict.
pub fn print_report(report: &ValidationReport) {
    if !report.issues.is_empty() {
        println!("{}", issue_table(report));
    }
    println!("{}", verdict(report));
}

/// Print the report as pretty JSON.
pub fn print_report_json(report: &ValidationReport) -> serde_json::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, report)?;
    writeln!(handle).map_err(serde_json::Error::io)
}

/// Final line: the error count, or confirmation that nothing was found.
pub fn verdict(report: &ValidationReport) -> String {
    if report.is_valid() {
        return format!("No errors found with this schema ({} rows).", report.rows_validated);
    }
    format!(
        "{} error(s): {} error, {} warning",
        report.issues.len(),
        report.error_count(),
        report.warning_count()
    )
}

pub fn issue_table(report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Value"),
        header_cell("Message"),
        header_cell("Suggested"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Right);
    for issue in &report.issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            row_cell(issue),
            Cell::new(issue.column.as_deref().unwrap_or(&issue.rule)),
            optional_cell(issue.value.as_deref()),
            Cell::new(&issue.message),
            optional_cell(issue.suggested_value.as_deref()).fg(Color::Green),
        ]);
    }
    table
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn row_cell(issue: &ValidationIssue) -> Cell {
    match issue.row_number {
        Some(row) => Cell::new(row),
        None => dim_cell("<dataset>"),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> ValidationIssue {
        ValidationIssue {
            severity,
            rule: "#sector".into(),
            description: None,
            row_number: Some(2),
            source_row_number: Some(4),
            column: Some("#sector".into()),
            value: Some("Wash ".into()),
            message: "Extra whitespace".into(),
            suggested_value: Some("Wash".into()),
        }
    }

    #[test]
    fn verdict_lines() {
        let mut report = ValidationReport {
            rows_validated: 3,
            issues: Vec::new(),
        };
        assert_eq!(verdict(&report), "No errors found with this schema (3 rows).");
        report.issues.push(issue(Severity::Error));
        assert_eq!(verdict(&report), "1 error(s): 1 error, 0 warning");
        report.issues.push(issue(Severity::Warning));
        assert_eq!(verdict(&report), "2 error(s): 1 error, 1 warning");
    }

    #[test]
    fn table_has_a_row_per_issue() {
        let report = ValidationReport {
            rows_validated: 3,
            issues: vec![issue(Severity::Error), issue(Severity::Warning)],
        };
        let table = issue_table(&report);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Extra whitespace"));
        assert!(rendered.contains("WARN"));
    }
}
