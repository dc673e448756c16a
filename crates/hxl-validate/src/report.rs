//! Severity levels and collected validation results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a rule failure is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Data is wrong
    #[default]
    Error,
    /// Data is suspicious
    Warning,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Owned record of one failure, detached from the rule and row it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Tag pattern of the failing rule.
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_row_number: Option<usize>,
    /// Display tag (or header) of the offending column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_value: Option<String>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_number {
            Some(row) => write!(f, "{row}")?,
            None => f.write_str("<dataset>")?,
        }
        write!(f, ",{}:", self.column.as_deref().unwrap_or(&self.rule))?;
        if let Some(value) = &self.value {
            write!(f, " \"{value}\"")?;
        }
        write!(f, " {}", self.message)?;
        if let Some(suggested) = &self.suggested_value {
            write!(f, " (suggested: \"{suggested}\")")?;
        }
        Ok(())
    }
}

/// Everything a schema found in one dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows_validated: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no rule reported anything, warnings included.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> ValidationIssue {
        ValidationIssue {
            severity,
            rule: "#sector".into(),
            description: None,
            row_number: Some(3),
            source_row_number: Some(5),
            column: Some("#sector+cluster".into()),
            value: Some("Wash".into()),
            message: "Value not allowed".into(),
            suggested_value: Some("WASH".into()),
        }
    }

    #[test]
    fn severity_parse() {
        assert_eq!(Severity::parse(" Warning "), Some(Severity::Warning));
        assert_eq!(Severity::parse("ERROR"), Some(Severity::Error));
        assert_eq!(Severity::parse("fatal"), None);
        assert_eq!(Severity::default(), Severity::Error);
    }

    #[test]
    fn counts_by_severity() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());
        report.issues.push(issue(Severity::Warning));
        assert!(!report.is_valid());
        assert!(!report.has_errors());
        report.issues.push(issue(Severity::Error));
        assert_eq!((report.error_count(), report.warning_count()), (1, 1));
    }

    #[test]
    fn display_line() {
        assert_eq!(
            issue(Severity::Error).to_string(),
            "3,#sector+cluster: \"Wash\" Value not allowed (suggested: \"WASH\")"
        );
        let mut general = issue(Severity::Error);
        general.row_number = None;
        general.column = None;
        general.value = None;
        general.suggested_value = None;
        assert_eq!(general.to_string(), "<dataset>,#sector: Value not allowed");
    }

    #[test]
    fn serializes_lowercase_severity() {
        let json = serde_json::to_value(issue(Severity::Warning)).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["suggested_value"], "WASH");
        assert!(json.get("description").is_none());
    }
}
