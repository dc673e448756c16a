use std::cell::OnceCell;
use std::sync::{Arc, LazyLock};

use hxl_model::{Column, Dataset, Row, Rows, TagPattern};
use regex::Regex;

use crate::error::{FilterError, Result};

static RENAME_SPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(#?[^:]+?)\s*:\s*(?:([^#]*)#)?([^#]+?)\s*$").expect("Invalid rename spec regex")
});

/// Retag (and optionally re-header) columns matching `pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameSpec {
    pub pattern: TagPattern,
    /// Replacement tag and attributes; its header, if any, replaces the old one.
    pub column: Column,
}

impl RenameSpec {
    /// Parse `#?<old>:<New header>?#?<new>`, e.g. `#sector:Cluster#sector+cluster`.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || FilterError::InvalidRenameSpec(spec.to_string());
        let captures = RENAME_SPEC_REGEX.captures(spec).ok_or_else(invalid)?;
        let pattern = TagPattern::parse(&captures[1]).map_err(|_| invalid())?;
        let header = captures.get(2).map(|m| m.as_str());
        let column = Column::parse_with_header(&format!("#{}", &captures[3]), header)
            .map_err(|_| invalid())?;
        Ok(Self { pattern, column })
    }

    fn apply(&self, column: &Column) -> Column {
        Column {
            tag: self.column.tag.clone(),
            attributes: self.column.attributes.clone(),
            header: self.column.header.clone().or_else(|| column.header.clone()),
            column_number: column.column_number,
        }
    }
}

/// Rewrites column descriptors; rows pass through with the new column list.
pub struct RenameFilter<S> {
    source: S,
    specs: Vec<RenameSpec>,
    columns: OnceCell<Arc<[Column]>>,
}

impl<S: Dataset> RenameFilter<S> {
    pub fn new(source: S, specs: Vec<RenameSpec>) -> Self {
        Self {
            source,
            specs,
            columns: OnceCell::new(),
        }
    }

    pub fn parse<I, T>(source: S, specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let specs = specs
            .into_iter()
            .map(|spec| RenameSpec::parse(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(source, specs))
    }
}

impl<S: Dataset> Dataset for RenameFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(self.columns.get_or_init(|| {
            self.source
                .columns()
                .iter()
                .map(|column| {
                    self.specs
                        .iter()
                        .find(|spec| spec.pattern.matches(column))
                        .map_or_else(|| column.clone(), |spec| spec.apply(column))
                })
                .collect()
        }))
    }

    fn rows(&self) -> Rows<'_> {
        let columns = self.columns();
        Box::new(self.source.rows().map(move |row| {
            Row::new(
                Arc::clone(&columns),
                row.values,
                row.row_number,
                row.source_row_number,
            )
        }))
    }
}
