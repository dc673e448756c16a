//! Substring and regex replacement over selected columns.

use std::sync::Arc;

use hxl_model::datatypes::is_truthy;
use hxl_model::{Column, Dataset, Row, Rows, TagPattern};
use regex::Regex;
use tracing::debug;

use crate::error::{FilterError, Result};

#[derive(Debug, Clone)]
enum Matcher {
    Literal(String),
    Regex(Regex),
}

/// One replacement rule. Every occurrence in a value is replaced.
#[derive(Debug, Clone)]
pub struct Replacement {
    pub original: String,
    pub replacement: String,
    /// Columns the rule applies to; `None` means every column.
    pub pattern: Option<TagPattern>,
    matcher: Matcher,
}

impl Replacement {
    /// Build a rule. With `is_regex`, `replacement` may use `$1`/`${name}` groups.
    pub fn new(
        original: impl Into<String>,
        replacement: impl Into<String>,
        pattern: Option<TagPattern>,
        is_regex: bool,
    ) -> Result<Self> {
        let original = original.into();
        let matcher = if is_regex {
            Matcher::Regex(Regex::new(&original).map_err(|source| {
                FilterError::InvalidReplacement {
                    pattern: original.clone(),
                    source,
                }
            })?)
        } else {
            Matcher::Literal(original.clone())
        };
        Ok(Self {
            original,
            replacement: replacement.into(),
            pattern,
            matcher,
        })
    }

    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Regex(_))
    }

    pub fn applies_to(&self, column: &Column) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.matches(column))
    }

    pub fn apply(&self, value: &str) -> String {
        match &self.matcher {
            Matcher::Literal(original) if original.is_empty() => value.to_string(),
            Matcher::Literal(original) => value.replace(original.as_str(), &self.replacement),
            Matcher::Regex(regex) => regex
                .replace_all(value, self.replacement.as_str())
                .into_owned(),
        }
    }

    /// Load an ordered rule list from a map dataset tagged `#x_pattern`,
    /// `#x_substitution`, and optionally `#x_tag` and `#x_regex`.
    /// Rows with an empty pattern are skipped.
    pub fn from_dataset<D: Dataset + ?Sized>(map: &D) -> Result<Vec<Self>> {
        let pattern_col = TagPattern::parse("#x_pattern")?;
        let substitution_col = TagPattern::parse("#x_substitution")?;
        let tag_col = TagPattern::parse("#x_tag")?;
        let regex_col = TagPattern::parse("#x_regex")?;

        let columns = map.columns();
        if pattern_col.find_column(&columns).is_none() {
            return Err(FilterError::MissingMapColumn("#x_pattern"));
        }
        if substitution_col.find_column(&columns).is_none() {
            return Err(FilterError::MissingMapColumn("#x_substitution"));
        }

        let mut replacements = Vec::new();
        for row in map.rows() {
            let Some(original) = row.get(&pattern_col).filter(|v| !v.is_empty()) else {
                continue;
            };
            let pattern = match row.get(&tag_col).map(str::trim).filter(|v| !v.is_empty()) {
                Some(spec) => Some(TagPattern::parse(spec)?),
                None => None,
            };
            let is_regex = row.get(&regex_col).is_some_and(is_truthy);
            replacements.push(Self::new(
                original,
                row.get(&substitution_col).unwrap_or_default(),
                pattern,
                is_regex,
            )?);
        }
        debug!(rules = replacements.len(), "loaded replacement map");
        Ok(replacements)
    }
}

/// Applies every replacement, in order, to the values of matching columns.
pub struct ReplaceDataFilter<S> {
    source: S,
    replacements: Vec<Replacement>,
}

impl<S: Dataset> ReplaceDataFilter<S> {
    pub fn new(source: S, replacements: Vec<Replacement>) -> Self {
        Self {
            source,
            replacements,
        }
    }

    /// Rule indices applicable to each column.
    fn plan(&self, columns: &[Column]) -> Vec<Vec<usize>> {
        columns
            .iter()
            .map(|column| {
                self.replacements
                    .iter()
                    .enumerate()
                    .filter(|(_, rule)| rule.applies_to(column))
                    .map(|(idx, _)| idx)
                    .collect()
            })
            .collect()
    }
}

impl<S: Dataset> Dataset for ReplaceDataFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        self.source.columns()
    }

    fn rows(&self) -> Rows<'_> {
        let plan = self.plan(&self.source.columns());
        Box::new(self.source.rows().map(move |row| {
            let Row {
                columns,
                mut values,
                row_number,
                source_row_number,
            } = row;
            for (value, rules) in values.iter_mut().zip(&plan) {
                for &idx in rules {
                    *value = self.replacements[idx].apply(value);
                }
            }
            Row::new(columns, values, row_number, source_row_number)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_replaces_every_occurrence() {
        let rule = Replacement::new("a", "o", None, false).unwrap();
        assert_eq!(rule.apply("banana"), "bonono");
        assert!(!rule.is_regex());
    }

    #[test]
    fn regex_uses_capture_groups() {
        let rule = Replacement::new(r"^(\w+) (\w+)$", "$2, $1", None, true).unwrap();
        assert_eq!(rule.apply("Jane Doe"), "Doe, Jane");
        assert_eq!(rule.apply("unchanged value here"), "unchanged value here");
    }

    #[test]
    fn bad_regex_fails_fast() {
        assert!(matches!(
            Replacement::new("(", "", None, true),
            Err(FilterError::InvalidReplacement { .. })
        ));
    }

    #[test]
    fn tag_pattern_limits_columns() {
        let rule = Replacement::new("x", "y", Some(TagPattern::parse("#org").unwrap()), false).unwrap();
        assert!(rule.applies_to(&Column::parse("#org+impl").unwrap()));
        assert!(!rule.applies_to(&Column::parse("#sector").unwrap()));
        assert!(!rule.applies_to(&Column::untagged(Some("Org"))));
    }
}
