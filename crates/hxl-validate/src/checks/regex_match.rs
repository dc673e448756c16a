use hxl_model::{Column, Row};
use regex::Regex;

use super::{Failure, RuleTest};
use crate::error::{Result, SchemaError};

/// Unanchored regular-expression match.
#[derive(Debug, Clone)]
pub struct RegexTest {
    regex: Regex,
}

impl RegexTest {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| SchemaError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl RuleTest for RegexTest {
    fn validate_cell(
        &mut self,
        value: &str,
        _row: Option<&Row>,
        _column: Option<&Column>,
    ) -> std::result::Result<(), Failure> {
        if self.regex.is_match(value) {
            Ok(())
        } else {
            Err(Failure::new(format!("Does not match pattern {}", self.pattern())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_anywhere_in_value() {
        let mut test = RegexTest::new("a+b").unwrap();
        assert!(test.validate_cell("xaab", None, None).is_ok());
        assert!(test.validate_cell("ab", None, None).is_ok());
        assert!(test.validate_cell("ba", None, None).is_err());
    }

    #[test]
    fn invalid_pattern_is_a_schema_error() {
        assert!(matches!(RegexTest::new("(unclosed"), Err(SchemaError::InvalidRegex { .. })));
    }
}
