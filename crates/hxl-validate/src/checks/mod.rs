//! Individual rule tests.
//!
//! Each test implements [`RuleTest`]. Most only look at one non-empty cell
//! at a time and override [`RuleTest::validate_cell`]; the stateful ones
//! (uniqueness, correlation, consistent datatype) work per row and reset
//! their state in [`RuleTest::start`].

mod consistent;
mod correlation;
mod datatype;
mod enumeration;
mod range;
mod regex_match;
mod required;
mod unique;
mod whitespace;

use std::fmt;

use hxl_model::{Column, Row, TagPattern};

pub use consistent::ConsistentDatatypeTest;
pub use correlation::CorrelationTest;
pub use datatype::{Datatype, DatatypeTest};
pub use enumeration::EnumerationTest;
pub use range::RangeTest;
pub use regex_match::RegexTest;
pub use required::RequiredTest;
pub use unique::UniqueTest;
pub use whitespace::WhitespaceTest;

/// A single value failed a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub suggested_value: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggested_value: None,
        }
    }

    pub fn with_suggestion(mut self, suggested_value: Option<String>) -> Self {
        self.suggested_value = suggested_value;
        self
    }
}

/// A failure located within a row or column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Index of the offending column, when the failure is about one cell.
    pub column_index: Option<usize>,
    pub value: Option<String>,
    pub message: String,
    pub suggested_value: Option<String>,
}

impl Finding {
    pub fn at(column_index: usize, value: &str, failure: Failure) -> Self {
        Self {
            column_index: Some(column_index),
            value: Some(value.to_string()),
            message: failure.message,
            suggested_value: failure.suggested_value,
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            column_index: None,
            value: None,
            message: message.into(),
            suggested_value: None,
        }
    }
}

/// One check attached to a schema rule.
pub trait RuleTest: fmt::Debug {
    /// Reset per-run state before a new dataset is validated.
    fn start(&mut self) {}

    /// Check one non-empty value. `row` and `column` are absent when a value
    /// is validated on its own.
    fn validate_cell(
        &mut self,
        _value: &str,
        _row: Option<&Row>,
        _column: Option<&Column>,
    ) -> Result<(), Failure> {
        Ok(())
    }

    /// Check a row. By default every non-empty cell matching `pattern` goes
    /// through [`RuleTest::validate_cell`].
    fn validate_row(&mut self, row: &Row, pattern: &TagPattern) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (idx, (column, value)) in row.cells().enumerate() {
            if !pattern.matches(column) || value.trim().is_empty() {
                continue;
            }
            if let Err(failure) = self.validate_cell(value, Some(row), Some(column)) {
                findings.push(Finding::at(idx, value, failure));
            }
        }
        findings
    }

    /// Column-level checks, run once per dataset after the rows.
    fn validate_dataset(&mut self, _columns: &[Column], _pattern: &TagPattern) -> Vec<Finding> {
        Vec::new()
    }
}
