//! Schema rules: a tag pattern plus the tests applied to matching columns.

use std::fmt;

use hxl_model::{Column, Row, TagPattern};
use tracing::trace;

use crate::checks::{EnumerationTest, Finding, RequiredTest, RuleTest};
use crate::report::{Severity, ValidationIssue};

/// One failure, borrowed from the rule and row that produced it.
#[derive(Debug, Clone)]
pub struct ValidationError<'a> {
    pub rule: &'a SchemaRule,
    /// Absent for column-level failures.
    pub row: Option<&'a Row>,
    pub column: Option<&'a Column>,
    pub value: Option<String>,
    pub message: String,
    pub suggested_value: Option<String>,
}

impl ValidationError<'_> {
    pub fn severity(&self) -> Severity {
        self.rule.severity
    }

    pub fn to_issue(&self) -> ValidationIssue {
        ValidationIssue {
            severity: self.rule.severity,
            rule: self.rule.pattern.to_string(),
            description: self.rule.description.clone(),
            row_number: self.row.map(|row| row.row_number),
            source_row_number: self.row.and_then(|row| row.source_row_number),
            column: self.column.map(ToString::to_string),
            value: self.value.clone(),
            message: self.message.clone(),
            suggested_value: self.suggested_value.clone(),
        }
    }
}

impl fmt::Display for ValidationError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_issue(), f)
    }
}

/// Receives each failure as it is found.
pub type Callback<'cb> = dyn FnMut(&ValidationError<'_>) + 'cb;

/// Tests applied to every column matching `pattern`.
#[derive(Debug)]
pub struct SchemaRule {
    pub pattern: TagPattern,
    pub severity: Severity,
    pub description: Option<String>,
    pub tests: Vec<Box<dyn RuleTest>>,
}

impl SchemaRule {
    pub fn new(pattern: TagPattern) -> Self {
        Self {
            pattern,
            severity: Severity::default(),
            description: None,
            tests: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_test(mut self, test: impl RuleTest + 'static) -> Self {
        self.tests.push(Box::new(test));
        self
    }

    pub fn with_enum<I, S>(self, values: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_test(EnumerationTest::new(values, case_sensitive))
    }

    pub fn with_occurs(self, min_occurs: Option<usize>, max_occurs: Option<usize>) -> Self {
        self.with_test(RequiredTest::new(min_occurs, max_occurs))
    }

    /// Reset every test's per-run state.
    pub fn start(&mut self) {
        for test in &mut self.tests {
            test.start();
        }
    }

    /// Run the row-level tests. Returns `false` if anything failed.
    pub fn validate_row(&mut self, row: &Row, callback: &mut Callback<'_>) -> bool {
        let findings: Vec<Finding> = self
            .tests
            .iter_mut()
            .flat_map(|test| test.validate_row(row, &self.pattern))
            .collect();
        self.report(findings, Some(row), &row.columns, callback)
    }

    /// Run the column-level tests. Returns `false` if anything failed.
    pub fn validate_columns(&mut self, columns: &[Column], callback: &mut Callback<'_>) -> bool {
        let findings: Vec<Finding> = self
            .tests
            .iter_mut()
            .flat_map(|test| test.validate_dataset(columns, &self.pattern))
            .collect();
        self.report(findings, None, columns, callback)
    }

    /// Check a lone value against the cell-level tests.
    pub fn validate_value(&mut self, value: &str, callback: &mut Callback<'_>) -> bool {
        let findings: Vec<Finding> = self
            .tests
            .iter_mut()
            .filter_map(|test| test.validate_cell(value, None, None).err())
            .map(|failure| Finding {
                column_index: None,
                value: Some(value.to_string()),
                message: failure.message,
                suggested_value: failure.suggested_value,
            })
            .collect();
        self.report(findings, None, &[], callback)
    }

    fn report(
        &self,
        findings: Vec<Finding>,
        row: Option<&Row>,
        columns: &[Column],
        callback: &mut Callback<'_>,
    ) -> bool {
        let passed = findings.is_empty();
        for finding in findings {
            let error = ValidationError {
                rule: self,
                row,
                column: finding.column_index.and_then(|idx| columns.get(idx)),
                value: finding.value,
                message: finding.message,
                suggested_value: finding.suggested_value,
            };
            trace!(rule = %self.pattern, message = %error.message, "rule failed");
            callback(&error);
        }
        passed
    }
}
