use std::cell::OnceCell;
use std::sync::Arc;

use hxl_model::{Column, Dataset, Row, Rows, TagPattern, matches_any};
use tracing::debug;

/// Keeps the columns matching `include` (all when empty) and not matching `exclude`.
pub struct ColumnFilter<S> {
    source: S,
    include: Vec<TagPattern>,
    exclude: Vec<TagPattern>,
    selection: OnceCell<(Arc<[Column]>, Vec<usize>)>,
}

impl<S: Dataset> ColumnFilter<S> {
    pub fn new(source: S, include: Vec<TagPattern>, exclude: Vec<TagPattern>) -> Self {
        Self {
            source,
            include,
            exclude,
            selection: OnceCell::new(),
        }
    }

    fn selection(&self) -> &(Arc<[Column]>, Vec<usize>) {
        self.selection.get_or_init(|| {
            let source = self.source.columns();
            let indices: Vec<usize> = source
                .iter()
                .enumerate()
                .filter(|(_, column)| {
                    (self.include.is_empty() || matches_any(&self.include, column))
                        && !matches_any(&self.exclude, column)
                })
                .map(|(idx, _)| idx)
                .collect();
            let columns: Arc<[Column]> = indices.iter().map(|&idx| source[idx].clone()).collect();
            debug!(kept = indices.len(), of = source.len(), "column selection");
            (columns, indices)
        })
    }
}

impl<S: Dataset> Dataset for ColumnFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(&self.selection().0)
    }

    fn rows(&self) -> Rows<'_> {
        let (columns, indices) = self.selection();
        Box::new(self.source.rows().map(move |row| {
            let values = indices
                .iter()
                .map(|&idx| row.value(idx).unwrap_or_default().to_string())
                .collect();
            Row::new(
                Arc::clone(columns),
                values,
                row.row_number,
                row.source_row_number,
            )
        }))
    }
}
