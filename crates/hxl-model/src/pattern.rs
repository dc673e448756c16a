use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::column::{AttributeSign, Column, split_tagspec};
use crate::error::{ModelError, Result};
use crate::row::Row;

/// Wildcard tag accepted in place of a concrete hashtag.
pub const WILDCARD_TAG: &str = "#*";

/// Compiled matcher for a tag plus required and excluded attributes.
///
/// Serializes as its display string, e.g. `#sector+cluster-code`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagPattern {
    /// Hashtag including `#`, or [`WILDCARD_TAG`].
    pub tag: String,
    pub include_attributes: BTreeSet<String>,
    pub exclude_attributes: BTreeSet<String>,
}

impl TagPattern {
    /// Parse a single pattern. The leading `#` is optional.
    pub fn parse(spec: &str) -> Result<Self> {
        let (tag, attributes) = split_tagspec(spec, false, true)
            .ok_or_else(|| ModelError::InvalidTagPattern(spec.to_string()))?;
        let mut pattern = Self {
            tag: format!("#{tag}"),
            include_attributes: BTreeSet::new(),
            exclude_attributes: BTreeSet::new(),
        };
        for (sign, attribute) in attributes {
            match sign {
                AttributeSign::Include => pattern.include_attributes.insert(attribute),
                AttributeSign::Exclude => pattern.exclude_attributes.insert(attribute),
            };
        }
        Ok(pattern)
    }

    /// Parse a comma-separated list of patterns, skipping empty entries.
    pub fn parse_list(specs: &str) -> Result<Vec<Self>> {
        specs
            .split(',')
            .map(str::trim)
            .filter(|spec| !spec.is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn is_wildcard(&self) -> bool {
        self.tag == WILDCARD_TAG
    }

    /// True if the column's tag matches and the attribute sets satisfy the
    /// include and exclude constraints. Untagged columns never match.
    pub fn matches(&self, column: &Column) -> bool {
        let Some(tag) = column.tag.as_deref() else {
            return false;
        };
        if !self.is_wildcard() && tag != self.tag {
            return false;
        }
        self.include_attributes
            .iter()
            .all(|attribute| column.attributes.contains(attribute))
            && self
                .exclude_attributes
                .iter()
                .all(|attribute| !column.attributes.contains(attribute))
    }

    pub fn find_column_index(&self, columns: &[Column]) -> Option<usize> {
        columns.iter().position(|column| self.matches(column))
    }

    /// First column in `columns` matching this pattern.
    pub fn find_column<'a>(&self, columns: &'a [Column]) -> Option<&'a Column> {
        columns.iter().find(|column| self.matches(column))
    }

    /// Value of the first matching column in `row`.
    pub fn get_value<'r>(&self, row: &'r Row) -> Option<&'r str> {
        row.cells()
            .find(|(column, _)| self.matches(column))
            .map(|(_, value)| value)
    }

    /// Values of every matching column in `row`, left to right.
    pub fn get_values<'r>(&self, row: &'r Row) -> Vec<&'r str> {
        row.cells()
            .filter(|(column, _)| self.matches(column))
            .map(|(_, value)| value)
            .collect()
    }
}

/// True if any pattern in `patterns` matches `column`.
pub fn matches_any(patterns: &[TagPattern], column: &Column) -> bool {
    patterns.iter().any(|pattern| pattern.matches(column))
}

impl fmt::Display for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        for attribute in &self.include_attributes {
            write!(f, "+{attribute}")?;
        }
        for attribute in &self.exclude_attributes {
            write!(f, "-{attribute}")?;
        }
        Ok(())
    }
}

impl FromStr for TagPattern {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TagPattern {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TagPattern> for String {
    fn from(pattern: TagPattern) -> Self {
        pattern.to_string()
    }
}
