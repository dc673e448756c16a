use std::sync::Arc;

use hxl_model::{Column, Dataset, Row, Rows};
use tracing::{debug, warn};

/// Materializes a source in memory, optionally capped at `max_rows`.
///
/// Unlike the other stages this one reads its source at construction time
/// and holds no reference to it afterwards.
#[derive(Debug, Clone)]
pub struct CacheFilter {
    columns: Arc<[Column]>,
    rows: Vec<Row>,
    overflow: bool,
}

impl CacheFilter {
    pub fn new<S: Dataset>(source: S, max_rows: Option<usize>) -> Self {
        let columns = source.columns();
        let mut rows = Vec::new();
        let mut overflow = false;
        for row in source.rows() {
            if max_rows.is_some_and(|max| rows.len() >= max) {
                overflow = true;
                break;
            }
            rows.push(Row::new(
                Arc::clone(&columns),
                row.values,
                row.row_number,
                row.source_row_number,
            ));
        }
        if overflow {
            warn!(max_rows = ?max_rows, "cache truncated source rows");
        }
        debug!(rows = rows.len(), overflow, "cached rows");
        Self {
            columns,
            rows,
            overflow,
        }
    }

    /// True if the source had more rows than `max_rows`.
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Dataset for CacheFilter {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(&self.columns)
    }

    fn rows(&self) -> Rows<'_> {
        Box::new(self.rows.iter().cloned())
    }
}
