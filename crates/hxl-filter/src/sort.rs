use std::cmp::Ordering;
use std::sync::Arc;

use hxl_model::datatypes::{normalise_string, parse_number};
use hxl_model::{Column, Dataset, Row, Rows, TagPattern};
use tracing::debug;

/// One component of a sort key. Numbers order before text.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn new(value: &str) -> Self {
        match parse_number(value) {
            Some(n) => Self::Number(n),
            None => Self::Text(normalise_string(value)),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

fn compare_keys(a: &[SortValue], b: &[SortValue]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.compare(y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Materializes and stably sorts the source rows.
///
/// Keys are the first value matching each pattern, or every value left to
/// right when no patterns are given.
pub struct SortFilter<S> {
    source: S,
    patterns: Vec<TagPattern>,
    reverse: bool,
}

impl<S: Dataset> SortFilter<S> {
    pub fn new(source: S, patterns: Vec<TagPattern>, reverse: bool) -> Self {
        Self {
            source,
            patterns,
            reverse,
        }
    }

    fn key(&self, row: &Row) -> Vec<SortValue> {
        if self.patterns.is_empty() {
            row.cells().map(|(_, value)| SortValue::new(value)).collect()
        } else {
            self.patterns
                .iter()
                .map(|pattern| SortValue::new(pattern.get_value(row).unwrap_or_default()))
                .collect()
        }
    }
}

impl<S: Dataset> Dataset for SortFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        self.source.columns()
    }

    fn rows(&self) -> Rows<'_> {
        let mut keyed: Vec<(Vec<SortValue>, Row)> = self
            .source
            .rows()
            .map(|row| (self.key(&row), row))
            .collect();
        let reverse = self.reverse;
        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = compare_keys(a, b);
            if reverse { ordering.reverse() } else { ordering }
        });
        debug!(rows = keyed.len(), reverse, "sorted rows");
        Box::new(
            keyed
                .into_iter()
                .enumerate()
                .map(|(row_number, (_, row))| row.renumbered(row_number)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_sort_numerically_and_before_text() {
        let mut values: Vec<SortValue> = ["10", "9", "apple", "Banana", "1.5"]
            .iter()
            .map(|v| SortValue::new(v))
            .collect();
        values.sort_by(SortValue::compare);
        assert_eq!(
            values,
            [
                SortValue::Number(1.5),
                SortValue::Number(9.0),
                SortValue::Number(10.0),
                SortValue::Text("apple".into()),
                SortValue::Text("banana".into()),
            ]
        );
    }
}
