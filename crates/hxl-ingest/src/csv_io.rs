//! CSV reading and writing.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use hxl_model::Dataset;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::tagged::MemoryDataset;

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}

/// Read every record from `reader` as raw strings. Record lengths may vary.
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(normalize_cell).collect());
    }
    debug!(rows = raw_rows.len(), "read raw CSV rows");
    Ok(raw_rows)
}

/// Read raw rows from a CSV file.
pub fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_from_reader(file)
}

/// Read a tagged CSV file into a [`MemoryDataset`].
pub fn read_dataset(path: &Path) -> Result<MemoryDataset> {
    MemoryDataset::from_raw(read_csv(path)?)
}

/// Which header rows to emit before the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub headers: bool,
    pub tags: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            headers: true,
            tags: true,
        }
    }
}

/// Write `dataset` as CSV. The header row is skipped when no column has a header.
pub fn write_csv<W: Write, D: Dataset + ?Sized>(
    writer: W,
    dataset: &D,
    options: WriteOptions,
) -> Result<usize> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);
    let columns = dataset.columns();
    if options.headers && columns.iter().any(|c| c.header.is_some()) {
        writer.write_record(columns.iter().map(|c| c.header.as_deref().unwrap_or("")))?;
    }
    if options.tags {
        writer.write_record(dataset.display_tags())?;
    }
    let mut written = 0usize;
    for row in dataset.rows() {
        writer.write_record(&row.values)?;
        written += 1;
    }
    writer.flush()?;
    debug!(rows = written, "wrote CSV rows");
    Ok(written)
}
