use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use hxl_model::datatypes::{is_date, is_number};
use hxl_model::{Column, Row};
use regex::Regex;

use super::{Failure, RuleTest};
use crate::error::SchemaError;

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?|ftp)://[^\s/?#.]+\.[^\s]+$").expect("Invalid URL regex")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex")
});

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[\d\s().-]*\d[\d\s().-]*$").expect("Invalid phone regex")
});

/// Value types a schema can demand of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    Text,
    Number,
    Url,
    Email,
    Phone,
    Date,
}

impl Datatype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Url => "url",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
        }
    }

    pub fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Text => true,
            Self::Number => is_number(value),
            Self::Url => URL_REGEX.is_match(value),
            Self::Email => EMAIL_REGEX.is_match(value),
            Self::Phone => PHONE_REGEX.is_match(value),
            Self::Date => is_date(value),
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Datatype {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "url" => Ok(Self::Url),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "date" => Ok(Self::Date),
            _ => Err(SchemaError::UnknownDatatype(s.trim().to_string())),
        }
    }
}

/// Every value must parse as the given datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatatypeTest {
    pub datatype: Datatype,
}

impl DatatypeTest {
    pub fn new(name: &str) -> crate::error::Result<Self> {
        Ok(Self {
            datatype: name.parse()?,
        })
    }
}

impl RuleTest for DatatypeTest {
    fn validate_cell(
        &mut self,
        value: &str,
        _row: Option<&Row>,
        _column: Option<&Column>,
    ) -> Result<(), Failure> {
        if self.datatype.accepts(value) {
            Ok(())
        } else {
            Err(Failure::new(format!("Expected a {}", self.datatype)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, value: &str) -> bool {
        DatatypeTest::new(name).unwrap().validate_cell(value, None, None).is_ok()
    }

    #[test]
    fn unknown_datatype_is_rejected() {
        assert!(matches!(
            DatatypeTest::new("xxx"),
            Err(SchemaError::UnknownDatatype(name)) if name == "xxx"
        ));
        assert!(DatatypeTest::new(" Number ").is_ok());
    }

    #[test]
    fn numbers() {
        assert!(check("number", " -10.1 "));
        assert!(check("number", "1,000"));
        assert!(!check("number", "abc"));
    }

    #[test]
    fn urls() {
        assert!(check("url", "http://example.org"));
        assert!(check("url", "https://example.org/path?q=1"));
        assert!(!check("url", "/example.org"));
        assert!(!check("url", "example.org"));
    }

    #[test]
    fn emails() {
        assert!(check("email", "nobody@example.org"));
        assert!(!check("email", "nobody@@example.org"));
        assert!(!check("email", "nobody.example.org"));
    }

    #[test]
    fn phones() {
        assert!(check("phone", "123-456-7890"));
        assert!(check("phone", "+1 (613) 555-0100"));
        assert!(!check("phone", "123-456-A890"));
    }

    #[test]
    fn dates() {
        assert!(check("date", "2018-05-01"));
        assert!(check("date", "1/1/17"));
        assert!(!check("date", "2018-05-32"));
        assert!(!check("date", "13/13/17"));
    }
}
