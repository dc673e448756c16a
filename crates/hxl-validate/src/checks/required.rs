use hxl_model::{Column, Row, TagPattern};

use super::{Finding, RuleTest};

/// Bounds on how many non-empty values a row may carry for the rule's
/// pattern. At dataset level only the minimum is checked, against the
/// number of matching columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredTest {
    pub min_occurs: Option<usize>,
    pub max_occurs: Option<usize>,
}

impl RequiredTest {
    pub fn new(min_occurs: Option<usize>, max_occurs: Option<usize>) -> Self {
        Self {
            min_occurs,
            max_occurs,
        }
    }
}

impl RuleTest for RequiredTest {
    fn validate_row(&mut self, row: &Row, pattern: &TagPattern) -> Vec<Finding> {
        let found = row
            .cells()
            .filter(|(column, value)| pattern.matches(column) && !value.trim().is_empty())
            .count();
        let mut findings = Vec::new();
        if let Some(min) = self.min_occurs
            && found < min
        {
            findings.push(Finding::general(format!(
                "Expected at least {min} non-empty value(s) for {pattern}, found {found}"
            )));
        }
        if let Some(max) = self.max_occurs
            && found > max
        {
            findings.push(Finding::general(format!(
                "Expected at most {max} non-empty value(s) for {pattern}, found {found}"
            )));
        }
        findings
    }

    fn validate_dataset(&mut self, columns: &[Column], pattern: &TagPattern) -> Vec<Finding> {
        let Some(min) = self.min_occurs else {
            return Vec::new();
        };
        let found = columns.iter().filter(|column| pattern.matches(column)).count();
        if found < min {
            vec![Finding::general(format!(
                "Expected at least {min} column(s) matching {pattern}, found {found}"
            ))]
        } else {
            Vec::new()
        }
    }
}
