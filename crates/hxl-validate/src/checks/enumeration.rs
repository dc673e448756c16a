use hxl_model::{Column, Row};

use super::{Failure, RuleTest};
use crate::util::closest;

/// Value must be one of a fixed list. The closest allowed value by edit
/// distance is offered as a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationTest {
    values: Vec<String>,
    case_sensitive: bool,
    folded: Vec<String>,
}

impl EnumerationTest {
    pub fn new<I, S>(values: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(Into::<String>::into)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        let folded = values.iter().map(|v| v.to_lowercase()).collect();
        Self {
            values,
            case_sensitive,
            folded,
        }
    }

    /// Parse a `|`-separated list such as `WASH|Health|Education`.
    pub fn parse(list: &str, case_sensitive: bool) -> Self {
        Self::new(list.split('|'), case_sensitive)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn contains(&self, value: &str) -> bool {
        let value = value.trim();
        if self.case_sensitive {
            self.values.iter().any(|allowed| allowed == value)
        } else {
            let value = value.to_lowercase();
            self.folded.contains(&value)
        }
    }
}

impl RuleTest for EnumerationTest {
    fn validate_cell(
        &mut self,
        value: &str,
        _row: Option<&Row>,
        _column: Option<&Column>,
    ) -> Result<(), Failure> {
        if self.contains(value) {
            return Ok(());
        }
        let suggestion = closest(
            value.trim(),
            self.values.iter().map(String::as_str),
            !self.case_sensitive,
        );
        Err(Failure::new("Value not allowed").with_suggestion(suggestion.map(String::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_sensitivity_is_configurable() {
        let mut strict = EnumerationTest::new(["aa", "bb", "cc"], true);
        assert!(strict.validate_cell("bb", None, None).is_ok());
        assert!(strict.validate_cell("BB", None, None).is_err());

        let mut relaxed = EnumerationTest::new(["aa", "bb", "cc"], false);
        assert!(relaxed.validate_cell("BB", None, None).is_ok());
        assert!(relaxed.validate_cell(" bb ", None, None).is_ok());
    }

    #[test]
    fn suggests_closest_allowed_value() {
        let mut test = EnumerationTest::new(["aa", "bb", "cc"], true);
        for probe in ["ccc", "dcc", "cdc"] {
            let failure = test.validate_cell(probe, None, None).unwrap_err();
            assert_eq!(failure.suggested_value.as_deref(), Some("cc"), "{probe}");
        }
    }

    #[test]
    fn parses_pipe_separated_list() {
        let test = EnumerationTest::parse("WASH|Salud| Educación |", false);
        assert_eq!(test.values(), ["WASH", "Salud", "Educación"]);
    }
}
