use hxl_model::datatypes::normalise_whitespace;
use hxl_model::{Column, Row};

use super::{Failure, RuleTest};

/// No leading or trailing whitespace, no runs of spaces, and no whitespace
/// other than a plain space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhitespaceTest;

impl RuleTest for WhitespaceTest {
    fn validate_cell(
        &mut self,
        value: &str,
        _row: Option<&Row>,
        _column: Option<&Column>,
    ) -> Result<(), Failure> {
        let normalised = normalise_whitespace(value);
        if normalised == value {
            Ok(())
        } else {
            Err(Failure::new("Extra whitespace").with_suggestion(Some(normalised)))
        }
    }
}
