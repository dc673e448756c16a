use std::collections::HashSet;
use std::sync::Arc;

use hxl_model::datatypes::normalise_string;
use hxl_model::{Column, Dataset, Rows, TagPattern, matches_any};

/// Drops rows whose normalised key repeats an earlier row.
///
/// The key is the values of columns matching `patterns`, or the whole row
/// when no patterns are given.
pub struct DedupFilter<S> {
    source: S,
    patterns: Vec<TagPattern>,
}

impl<S: Dataset> DedupFilter<S> {
    pub fn new(source: S, patterns: Vec<TagPattern>) -> Self {
        Self { source, patterns }
    }
}

impl<S: Dataset> Dataset for DedupFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        self.source.columns()
    }

    fn rows(&self) -> Rows<'_> {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut row_number = 0usize;
        Box::new(self.source.rows().filter_map(move |row| {
            let key: Vec<String> = row
                .cells()
                .filter(|(column, _)| self.patterns.is_empty() || matches_any(&self.patterns, column))
                .map(|(_, value)| normalise_string(value))
                .collect();
            if !seen.insert(key) {
                return None;
            }
            let row = row.renumbered(row_number);
            row_number += 1;
            Some(row)
        }))
    }
}
