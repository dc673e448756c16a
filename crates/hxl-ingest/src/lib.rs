//! HXL ingestion utilities.
//!
//! Everything here sits at the boundary of the pipeline: raw rows come in,
//! tagged [`hxl_model::Dataset`]s come out, and datasets can be written back
//! out as CSV.
//!
//! - **Hashtag detection**: find the hashtag row (and header row above it)
//! - **Memory datasets**: repeatable in-memory sources
//! - **CSV**: read raw records and write datasets
//! - **Tagging**: add hashtags to untagged input by header text

mod csv_io;
mod error;
mod tagged;
mod tagger;

pub use csv_io::{WriteOptions, read_csv, read_csv_from_reader, read_dataset, write_csv};
pub use error::{IngestError, Result};
pub use tagged::{
    HASHTAG_SCAN_ROWS, MemoryDataset, build_columns, find_hashtag_row, parse_tagged_rows,
};
pub use tagger::{TagSpec, Tagger};
