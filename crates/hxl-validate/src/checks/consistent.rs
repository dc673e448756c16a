use hxl_model::datatypes::{is_boolean, is_number};
use hxl_model::{Column, Row};

use super::{Failure, RuleTest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Number,
    Boolean,
    Text,
}

impl ValueKind {
    fn of(value: &str) -> Self {
        if is_number(value) {
            Self::Number
        } else if is_boolean(value) {
            Self::Boolean
        } else {
            Self::Text
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }
}

/// All values of the rule's columns must share the kind (number, boolean or text)
/// of the first value seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsistentDatatypeTest {
    established: Option<ValueKind>,
}

impl RuleTest for ConsistentDatatypeTest {
    fn start(&mut self) {
        self.established = None;
    }

    fn validate_cell(
        &mut self,
        value: &str,
        _row: Option<&Row>,
        _column: Option<&Column>,
    ) -> Result<(), Failure> {
        let kind = ValueKind::of(value);
        match self.established {
            None => {
                self.established = Some(kind);
                Ok(())
            }
            Some(expected) if expected == kind => Ok(()),
            Some(expected) => Err(Failure::new(format!(
                "Expected a {}, like the values before it",
                expected.label()
            ))),
        }
    }
}
