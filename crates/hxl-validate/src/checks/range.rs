use std::cmp::Ordering;

use hxl_model::datatypes::{is_date_column, normalise_string, parse_date, parse_number};
use hxl_model::{Column, Row};

use super::{Failure, RuleTest};

/// Inclusive bounds on a value.
///
/// Values compare as dates in date columns when both sides parse, as
/// numbers when both sides are numeric, and as normalised text otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTest {
    pub min_value: Option<String>,
    pub max_value: Option<String>,
}

impl RangeTest {
    pub fn new(min_value: Option<String>, max_value: Option<String>) -> Self {
        Self {
            min_value: min_value.filter(|v| !v.trim().is_empty()),
            max_value: max_value.filter(|v| !v.trim().is_empty()),
        }
    }
}

fn compare_bounded(value: &str, bound: &str, column: Option<&Column>) -> Ordering {
    if column.is_some_and(is_date_column)
        && let (Some(a), Some(b)) = (parse_date(value), parse_date(bound))
    {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (parse_number(value), parse_number(bound)) {
        return a.total_cmp(&b);
    }
    normalise_string(value).cmp(&normalise_string(bound))
}

impl RuleTest for RangeTest {
    fn validate_cell(
        &mut self,
        value: &str,
        _row: Option<&Row>,
        column: Option<&Column>,
    ) -> Result<(), Failure> {
        if let Some(min) = &self.min_value
            && compare_bounded(value, min, column) == Ordering::Less
        {
            return Err(Failure::new(format!("Value is less than {}", min.trim())));
        }
        if let Some(max) = &self.max_value
            && compare_bounded(value, max, column) == Ordering::Greater
        {
            return Err(Failure::new(format!("Value is greater than {}", max.trim())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: Option<&str>, max: Option<&str>) -> RangeTest {
        RangeTest::new(min.map(String::from), max.map(String::from))
    }

    #[test]
    fn numeric_bounds() {
        let mut test = range(Some("3.5"), Some("4.5"));
        assert!(test.validate_cell("3.5", None, None).is_ok());
        assert!(test.validate_cell("4", None, None).is_ok());
        assert!(test.validate_cell("3.49", None, None).is_err());
        assert!(test.validate_cell("4.51", None, None).is_err());
        assert!(range(Some("200"), None).validate_cell("1000", None, None).is_ok());
    }

    #[test]
    fn date_bounds_apply_in_date_columns() {
        let column = Column::parse("#date").unwrap();
        let mut test = range(None, Some("2018-01-01"));
        assert!(test.validate_cell("Jan-2/18", None, Some(&column)).is_err());
        assert!(test.validate_cell("Dec 31 2017", None, Some(&column)).is_ok());
    }

    #[test]
    fn text_bounds_are_case_insensitive() {
        assert!(range(None, Some("e")).validate_cell(" EaE", None, None).is_err());
        assert!(range(Some("c"), None).validate_cell(" Ccc", None, None).is_ok());
        assert!(range(Some("c"), None).validate_cell("b", None, None).is_err());
    }
}
