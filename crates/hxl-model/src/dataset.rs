//! The dataset contract shared by raw sources and every pipeline stage.

use std::sync::Arc;

use crate::column::Column;
use crate::row::Row;

/// Boxed row iterator handed out by [`Dataset::rows`].
pub type Rows<'a> = Box<dyn Iterator<Item = Row> + 'a>;

/// An ordered column list plus a repeatable row stream.
///
/// `columns` is computed once per instance and returned as a shared handle;
/// every row yielded by `rows` refers to that same list. Each call to `rows`
/// starts an independent traversal.
pub trait Dataset {
    fn columns(&self) -> Arc<[Column]>;

    fn rows(&self) -> Rows<'_>;

    /// Tags of every column (`None` for untagged columns).
    fn tags(&self) -> Vec<Option<String>> {
        self.columns().iter().map(|c| c.tag.clone()).collect()
    }

    fn headers(&self) -> Vec<Option<String>> {
        self.columns().iter().map(|c| c.header.clone()).collect()
    }

    /// Display tags (`#tag+attrs`), empty for untagged columns.
    fn display_tags(&self) -> Vec<String> {
        self.columns()
            .iter()
            .map(|c| c.display_tag().unwrap_or_default())
            .collect()
    }

    /// True if at least one column carries a header.
    fn has_headers(&self) -> bool {
        self.columns().iter().any(|c| c.header.is_some())
    }

    /// All values of every row, materialized.
    fn values(&self) -> Vec<Vec<String>> {
        self.rows().map(|row| row.values).collect()
    }
}

impl<D: Dataset + ?Sized> Dataset for &D {
    fn columns(&self) -> Arc<[Column]> {
        (**self).columns()
    }

    fn rows(&self) -> Rows<'_> {
        (**self).rows()
    }
}

impl<D: Dataset + ?Sized> Dataset for Box<D> {
    fn columns(&self) -> Arc<[Column]> {
        (**self).columns()
    }

    fn rows(&self) -> Rows<'_> {
        (**self).rows()
    }
}
