use std::sync::Arc;

use hxl_model::{Column, Dataset, RowQuery, Rows};
use tracing::trace;

/// Keeps rows matching any query (or, with `reverse`, rows matching none).
///
/// With no queries every row is kept, unless `reverse` is set.
pub struct RowFilter<S> {
    source: S,
    queries: Vec<RowQuery>,
    reverse: bool,
}

impl<S: Dataset> RowFilter<S> {
    pub fn new(source: S, queries: Vec<RowQuery>, reverse: bool) -> Self {
        Self {
            source,
            queries,
            reverse,
        }
    }
}

impl<S: Dataset> Dataset for RowFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        self.source.columns()
    }

    fn rows(&self) -> Rows<'_> {
        let mut row_number = 0usize;
        Box::new(self.source.rows().filter_map(move |row| {
            let matched =
                self.queries.is_empty() || self.queries.iter().any(|query| query.matches_row(&row));
            if matched == self.reverse {
                trace!(source_row = ?row.source_row_number, "row dropped");
                return None;
            }
            let row = row.renumbered(row_number);
            row_number += 1;
            Some(row)
        }))
    }
}
