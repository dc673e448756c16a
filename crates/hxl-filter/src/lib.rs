//! Composable HXL filter pipeline.
//!
//! Every stage wraps an upstream [`Dataset`](hxl_model::Dataset) and is itself
//! a dataset, so stages chain without limit. Column lists are computed once
//! per stage; rows are produced lazily on each traversal. Count, Sort, Cache
//! and the merge side of Merge read their whole input before yielding.

mod add;
mod append;
mod cache;
mod clean;
mod columns;
mod count;
mod dedup;
mod error;
mod ext;
mod merge;
mod rename;
mod replace;
mod rows;
mod sort;

pub use add::{AddColumnsFilter, AddSpec};
pub use append::AppendFilter;
pub use cache::CacheFilter;
pub use clean::{CleanFilter, CleanOptions, Selection, clean_number};
pub use columns::ColumnFilter;
pub use count::{Aggregator, CountFilter};
pub use dedup::DedupFilter;
pub use error::{FilterError, Result};
pub use ext::DatasetExt;
pub use merge::{MergeDataFilter, MergeOptions};
pub use rename::{RenameFilter, RenameSpec};
pub use replace::{ReplaceDataFilter, Replacement};
pub use rows::RowFilter;
pub use sort::SortFilter;
