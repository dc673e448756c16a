use std::sync::Arc;

use crate::column::Column;
use crate::pattern::TagPattern;

/// One data row aligned positionally with a shared column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub columns: Arc<[Column]>,
    pub values: Vec<String>,
    /// 0-based logical index assigned by the producing stage.
    pub row_number: usize,
    /// Position in the original input, carried through every stage.
    pub source_row_number: Option<usize>,
}

impl Row {
    pub fn new(
        columns: Arc<[Column]>,
        values: Vec<String>,
        row_number: usize,
        source_row_number: Option<usize>,
    ) -> Self {
        Self {
            columns,
            values,
            row_number,
            source_row_number,
        }
    }

    /// Build a row whose values are padded with empty strings or truncated
    /// to exactly `columns.len()`.
    pub fn aligned(
        columns: Arc<[Column]>,
        mut values: Vec<String>,
        row_number: usize,
        source_row_number: Option<usize>,
    ) -> Self {
        values.resize(columns.len(), String::new());
        Self::new(columns, values, row_number, source_row_number)
    }

    /// Number of usable positions: `min(values, columns)`.
    pub fn width(&self) -> usize {
        self.values.len().min(self.columns.len())
    }

    /// Value at `index`, or `None` past the usable width.
    pub fn value(&self, index: usize) -> Option<&str> {
        if index < self.width() {
            Some(self.values[index].as_str())
        } else {
            None
        }
    }

    /// Column/value pairs up to the usable width.
    pub fn cells(&self) -> impl Iterator<Item = (&Column, &str)> + '_ {
        self.columns
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    /// First value whose column matches `pattern`.
    pub fn get(&self, pattern: &TagPattern) -> Option<&str> {
        pattern.get_value(self)
    }

    /// Every value whose column matches `pattern`.
    pub fn get_all(&self, pattern: &TagPattern) -> Vec<&str> {
        pattern.get_values(self)
    }

    /// Same row with a new logical number.
    #[must_use]
    pub fn renumbered(mut self, row_number: usize) -> Self {
        self.row_number = row_number;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(specs: &[&str]) -> Arc<[Column]> {
        specs
            .iter()
            .map(|spec| Column::parse(spec).unwrap())
            .collect()
    }

    #[test]
    fn aligned_pads_and_truncates() {
        let cols = columns(&["#a", "#b", "#c"]);
        let short = Row::aligned(cols.clone(), vec!["1".into()], 0, Some(2));
        assert_eq!(short.values, ["1", "", ""]);
        let long = Row::aligned(cols, vec!["1".into(), "2".into(), "3".into(), "4".into()], 1, None);
        assert_eq!(long.values, ["1", "2", "3"]);
    }

    #[test]
    fn ragged_rows_use_the_shorter_length() {
        let cols = columns(&["#a", "#b", "#c"]);
        let row = Row::new(cols, vec!["x".into()], 0, None);
        assert_eq!(row.width(), 1);
        assert_eq!(row.value(0), Some("x"));
        assert_eq!(row.value(2), None);
        assert_eq!(row.cells().count(), 1);
    }

    #[test]
    fn get_and_get_all_follow_pattern_matching() {
        let cols = columns(&["#org", "#sector+cluster", "#sector+es"]);
        let row = Row::new(
            cols,
            vec!["UNICEF".into(), "WASH".into(), "Agua".into()],
            0,
            None,
        );
        let sector = TagPattern::parse("#sector").unwrap();
        assert_eq!(row.get(&sector), Some("WASH"));
        assert_eq!(row.get_all(&sector), ["WASH", "Agua"]);
        assert_eq!(row.get(&TagPattern::parse("#adm1").unwrap()), None);
    }
}
