//! Hashtag-row detection over raw rows.

use std::sync::Arc;

use hxl_model::{Column, Dataset, Row, Rows};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Number of leading raw rows searched for the hashtag row.
pub const HASHTAG_SCAN_ROWS: usize = 25;

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    non_empty: usize,
    hashtags: usize,
}

impl RowStats {
    fn hashtag_ratio(self) -> f64 {
        if self.non_empty == 0 {
            0.0
        } else {
            self.hashtags as f64 / self.non_empty as f64
        }
    }
}

fn row_stats(row: &[String]) -> RowStats {
    let mut stats = RowStats::default();
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if Column::parse(trimmed).is_ok() {
            stats.hashtags += 1;
        }
    }
    stats
}

fn is_hashtag_row(stats: RowStats) -> bool {
    stats.hashtags > 0 && stats.hashtag_ratio() >= 0.5
}

/// Index of the hashtag row within the first [`HASHTAG_SCAN_ROWS`] rows.
pub fn find_hashtag_row(raw: &[Vec<String>]) -> Option<usize> {
    raw.iter()
        .take(HASHTAG_SCAN_ROWS)
        .position(|row| is_hashtag_row(row_stats(row)))
}

/// Build the column list from a hashtag row and the optional header row above it.
pub fn build_columns(tag_row: &[String], header_row: Option<&[String]>) -> Arc<[Column]> {
    tag_row
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let header = header_row
                .and_then(|headers| headers.get(idx))
                .map(String::as_str);
            Column::parse_with_header(spec, header)
                .unwrap_or_else(|_| Column::untagged(header))
                .with_column_number(idx)
        })
        .collect()
}

/// In-memory dataset; every traversal replays the stored rows.
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    columns: Arc<[Column]>,
    rows: Vec<(Vec<String>, Option<usize>)>,
}

impl MemoryDataset {
    /// Wrap pre-built columns and value rows. Rows are stored as given.
    pub fn new(columns: impl Into<Arc<[Column]>>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, values)| (values, Some(idx)))
            .collect();
        Self {
            columns: columns.into(),
            rows,
        }
    }

    /// Locate the hashtag row in `raw` and keep every row after it as data,
    /// padded or truncated to the column count.
    pub fn from_raw(raw: Vec<Vec<String>>) -> Result<Self> {
        let tag_index = find_hashtag_row(&raw).ok_or(IngestError::NoHashtagRow {
            scanned: raw.len().min(HASHTAG_SCAN_ROWS),
        })?;
        let header_row = tag_index.checked_sub(1).map(|idx| raw[idx].as_slice());
        let columns = build_columns(&raw[tag_index], header_row);
        debug!(
            tag_row = tag_index,
            columns = columns.len(),
            has_headers = header_row.is_some(),
            "hashtag row detected"
        );
        let width = columns.len();
        let rows = raw
            .into_iter()
            .enumerate()
            .skip(tag_index + 1)
            .map(|(raw_index, mut values)| {
                values.resize(width, String::new());
                (values, Some(raw_index))
            })
            .collect();
        Ok(Self { columns, rows })
    }

    /// Materialize any dataset.
    pub fn from_dataset<D: Dataset + ?Sized>(source: &D) -> Self {
        let columns = source.columns();
        let rows = source
            .rows()
            .map(|row| (row.values, row.source_row_number))
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Dataset for MemoryDataset {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(&self.columns)
    }

    fn rows(&self) -> Rows<'_> {
        let columns = self.columns();
        Box::new(
            self.rows
                .iter()
                .enumerate()
                .map(move |(row_number, (values, source))| {
                    Row::new(Arc::clone(&columns), values.clone(), row_number, *source)
                }),
        )
    }
}

/// Convenience wrapper for [`MemoryDataset::from_raw`].
pub fn parse_tagged_rows(raw: Vec<Vec<String>>) -> Result<MemoryDataset> {
    MemoryDataset::from_raw(raw)
}
