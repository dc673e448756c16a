//! Row predicates of the form `tag<op>value`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::datatypes::{normalise_string, parse_number};
use crate::error::{ModelError, Result};
use crate::pattern::TagPattern;
use crate::row::Row;

static QUERY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#?([^!=<>~]+?)\s*(!=|!~|<=|>=|=|<|>|~)\s*(.*)$").expect("Invalid query regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Matches,
    NotMatches,
}

impl QueryOperator {
    fn parse(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "~" => Self::Matches,
            "!~" => Self::NotMatches,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Matches => "~",
            Self::NotMatches => "!~",
        }
    }

    /// Negative operators must hold for every matching cell.
    pub fn is_negative(self) -> bool {
        matches!(self, Self::Ne | Self::NotMatches)
    }
}

/// A single `tag op value` predicate.
#[derive(Debug, Clone)]
pub struct RowQuery {
    pub pattern: TagPattern,
    pub operator: QueryOperator,
    pub value: String,
    regex: Option<Regex>,
}

impl RowQuery {
    pub fn new(pattern: TagPattern, operator: QueryOperator, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let regex = match operator {
            QueryOperator::Matches | QueryOperator::NotMatches => Some(
                Regex::new(&value).map_err(|source| ModelError::InvalidRegex {
                    pattern: value.clone(),
                    source,
                })?,
            ),
            _ => None,
        };
        Ok(Self {
            pattern,
            operator,
            value,
            regex,
        })
    }

    /// Parse `org=UNICEF`, `#affected>=100`, `sector~^wash`.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidQuery(spec.to_string());
        let captures = QUERY_REGEX.captures(spec).ok_or_else(invalid)?;
        let pattern = TagPattern::parse(&captures[1]).map_err(|_| invalid())?;
        let operator = QueryOperator::parse(&captures[2]).ok_or_else(invalid)?;
        Self::new(pattern, operator, captures[3].trim())
    }

    pub fn parse_list<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>> {
        specs.iter().map(|spec| Self::parse(spec.as_ref())).collect()
    }

    /// Evaluate against every cell whose column matches the pattern.
    ///
    /// Positive operators need one satisfying cell; negative operators need
    /// all of them, so a row without the column satisfies `!=` and `!~`.
    pub fn matches_row(&self, row: &Row) -> bool {
        let mut values = row
            .cells()
            .filter(|(column, _)| self.pattern.matches(column))
            .map(|(_, value)| value);
        if self.operator.is_negative() {
            values.all(|value| self.matches_value(value))
        } else {
            values.any(|value| self.matches_value(value))
        }
    }

    pub fn matches_value(&self, value: &str) -> bool {
        if let Some(regex) = &self.regex {
            let found = regex.is_match(value);
            return if self.operator == QueryOperator::Matches {
                found
            } else {
                !found
            };
        }
        let ordering = compare_values(value, &self.value);
        match self.operator {
            QueryOperator::Eq => ordering == Ordering::Equal,
            QueryOperator::Ne => ordering != Ordering::Equal,
            QueryOperator::Lt => ordering == Ordering::Less,
            QueryOperator::Le => ordering != Ordering::Greater,
            QueryOperator::Gt => ordering == Ordering::Greater,
            QueryOperator::Ge => ordering != Ordering::Less,
            QueryOperator::Matches | QueryOperator::NotMatches => false,
        }
    }
}

/// Numeric comparison when both sides are numbers, otherwise normalised text.
pub fn compare_values(left: &str, right: &str) -> Ordering {
    match (parse_number(left), parse_number(right)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => normalise_string(left).cmp(&normalise_string(right)),
    }
}

impl fmt::Display for RowQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pattern, self.operator.symbol(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::column::Column;

    fn row(specs: &[&str], values: &[&str]) -> Row {
        let columns: Arc<[Column]> = specs.iter().map(|s| Column::parse(s).unwrap()).collect();
        Row::new(columns, values.iter().map(|v| v.to_string()).collect(), 0, None)
    }

    #[test]
    fn parses_operators() {
        let query = RowQuery::parse("#affected >= 100").unwrap();
        assert_eq!(query.operator, QueryOperator::Ge);
        assert_eq!(query.value, "100");
        assert_eq!(query.to_string(), "#affected>=100");
        assert_eq!(RowQuery::parse("org!~^un").unwrap().operator, QueryOperator::NotMatches);
        assert!(RowQuery::parse("no operator here").is_err());
        assert!(RowQuery::parse("#org~[").is_err());
    }

    #[test]
    fn text_comparison_is_normalised() {
        let r = row(&["#org"], &["  UNICEF "]);
        assert!(RowQuery::parse("#org=unicef").unwrap().matches_row(&r));
        assert!(RowQuery::parse("#org<zzz").unwrap().matches_row(&r));
    }

    #[test]
    fn numeric_comparison_when_both_numeric() {
        let r = row(&["#affected"], &["90"]);
        assert!(RowQuery::parse("#affected<100").unwrap().matches_row(&r));
        assert!(!RowQuery::parse("#affected>=100").unwrap().matches_row(&r));
        assert!(RowQuery::parse("#affected=90.0").unwrap().matches_row(&r));
    }

    #[test]
    fn positive_any_negative_all() {
        let r = row(&["#sector", "#sector"], &["WASH", "Health"]);
        assert!(RowQuery::parse("#sector=health").unwrap().matches_row(&r));
        assert!(!RowQuery::parse("#sector!=health").unwrap().matches_row(&r));
        assert!(RowQuery::parse("#adm1!=x").unwrap().matches_row(&r));
        assert!(!RowQuery::parse("#adm1=x").unwrap().matches_row(&r));
    }

    #[test]
    fn regex_is_unanchored() {
        let r = row(&["#org"], &["Red Cross"]);
        assert!(RowQuery::parse("#org~Cross").unwrap().matches_row(&r));
        assert!(RowQuery::parse("#org!~^Cross").unwrap().matches_row(&r));
    }
}
