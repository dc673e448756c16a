//! Fluent shortcuts for building pipelines.
//!
//! ```ignore
//! let report = source
//!     .with_rows(RowQuery::parse_list(&["#sector=WASH"])?)
//!     .count(TagPattern::parse_list("#adm1")?, None)?
//!     .sort(Vec::new(), false);
//! ```

use hxl_model::{Dataset, RowQuery, TagPattern};

use crate::add::{AddColumnsFilter, AddSpec};
use crate::append::AppendFilter;
use crate::cache::CacheFilter;
use crate::clean::{CleanFilter, CleanOptions};
use crate::columns::ColumnFilter;
use crate::count::CountFilter;
use crate::dedup::DedupFilter;
use crate::error::Result;
use crate::merge::{MergeDataFilter, MergeOptions};
use crate::rename::{RenameFilter, RenameSpec};
use crate::replace::{ReplaceDataFilter, Replacement};
use crate::rows::RowFilter;
use crate::sort::SortFilter;

/// Wrap any dataset in a filter stage. Pass `&dataset` to keep ownership.
pub trait DatasetExt: Dataset + Sized {
    fn add_columns(self, specs: Vec<AddSpec>, before: bool) -> AddColumnsFilter<Self> {
        AddColumnsFilter::new(self, specs, before)
    }

    fn append<A: Dataset>(self, other: A, add_columns: bool) -> AppendFilter<Self, A> {
        AppendFilter::new(self, other, add_columns)
    }

    fn cache(self, max_rows: Option<usize>) -> CacheFilter {
        CacheFilter::new(self, max_rows)
    }

    fn clean(self, options: CleanOptions) -> CleanFilter<Self> {
        CleanFilter::new(self, options)
    }

    fn with_columns(self, include: Vec<TagPattern>) -> ColumnFilter<Self> {
        ColumnFilter::new(self, include, Vec::new())
    }

    fn without_columns(self, exclude: Vec<TagPattern>) -> ColumnFilter<Self> {
        ColumnFilter::new(self, Vec::new(), exclude)
    }

    fn count(self, patterns: Vec<TagPattern>, aggregate: Option<TagPattern>) -> Result<CountFilter<Self>> {
        CountFilter::new(self, patterns, aggregate)
    }

    fn dedup(self, patterns: Vec<TagPattern>) -> DedupFilter<Self> {
        DedupFilter::new(self, patterns)
    }

    fn merge<M: Dataset>(
        self,
        merge: M,
        keys: Vec<TagPattern>,
        tags: Vec<TagPattern>,
        options: MergeOptions,
    ) -> MergeDataFilter<Self, M> {
        MergeDataFilter::new(self, merge, keys, tags, options)
    }

    fn rename(self, specs: Vec<RenameSpec>) -> RenameFilter<Self> {
        RenameFilter::new(self, specs)
    }

    fn replace(self, replacements: Vec<Replacement>) -> ReplaceDataFilter<Self> {
        ReplaceDataFilter::new(self, replacements)
    }

    fn with_rows(self, queries: Vec<RowQuery>) -> RowFilter<Self> {
        RowFilter::new(self, queries, false)
    }

    fn without_rows(self, queries: Vec<RowQuery>) -> RowFilter<Self> {
        RowFilter::new(self, queries, true)
    }

    fn sort(self, patterns: Vec<TagPattern>, reverse: bool) -> SortFilter<Self> {
        SortFilter::new(self, patterns, reverse)
    }
}

impl<D: Dataset> DatasetExt for D {}
