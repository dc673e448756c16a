//! Add constant-valued columns.

use std::cell::OnceCell;
use std::sync::{Arc, LazyLock};

use hxl_model::{Column, Dataset, Row, Rows};
use regex::Regex;
use tracing::debug;

use crate::error::{FilterError, Result};

static ADD_SPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:([^#]*)#)?([A-Za-z][_0-9A-Za-z]*(?:\s*\+[A-Za-z][_0-9A-Za-z]*)*)=(.*?)\s*$")
        .expect("Invalid add spec regex")
});

/// A constant column: descriptor plus the value written into every row.
#[derive(Debug, Clone, PartialEq)]
pub struct AddSpec {
    pub column: Column,
    pub value: String,
}

impl AddSpec {
    pub fn new(column: Column, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Parse `Header text#tag+attr=value`; the header part is optional.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || FilterError::InvalidAddSpec(spec.to_string());
        let captures = ADD_SPEC_REGEX.captures(spec).ok_or_else(invalid)?;
        let header = captures.get(1).map(|m| m.as_str());
        let column = Column::parse_with_header(&format!("#{}", &captures[2]), header)
            .map_err(|_| invalid())?;
        Ok(Self::new(column, &captures[3]))
    }
}

/// Appends (or prepends) constant columns to every row.
pub struct AddColumnsFilter<S> {
    source: S,
    specs: Vec<AddSpec>,
    before: bool,
    columns: OnceCell<Arc<[Column]>>,
}

impl<S: Dataset> AddColumnsFilter<S> {
    pub fn new(source: S, specs: Vec<AddSpec>, before: bool) -> Self {
        Self {
            source,
            specs,
            before,
            columns: OnceCell::new(),
        }
    }

    /// Parse every spec string, failing on the first malformed one.
    pub fn parse<I, T>(source: S, specs: I, before: bool) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let specs = specs
            .into_iter()
            .map(|spec| AddSpec::parse(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(source, specs, before))
    }

    fn constant_values(&self) -> Vec<String> {
        self.specs.iter().map(|spec| spec.value.clone()).collect()
    }
}

impl<S: Dataset> Dataset for AddColumnsFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(self.columns.get_or_init(|| {
            let source = self.source.columns();
            let added = self.specs.iter().map(|spec| spec.column.clone());
            let columns: Arc<[Column]> = if self.before {
                added.chain(source.iter().cloned()).collect()
            } else {
                source.iter().cloned().chain(added).collect()
            };
            debug!(added = self.specs.len(), before = self.before, "add columns");
            columns
        }))
    }

    fn rows(&self) -> Rows<'_> {
        let columns = self.columns();
        let source_width = self.source.columns().len();
        let constants = self.constant_values();
        let before = self.before;
        Box::new(self.source.rows().map(move |row| {
            let mut values = row.values;
            values.resize(source_width, String::new());
            if before {
                let mut out = constants.clone();
                out.extend(values);
                values = out;
            } else {
                values.extend(constants.iter().cloned());
            }
            Row::new(
                Arc::clone(&columns),
                values,
                row.row_number,
                row.source_row_number,
            )
        }))
    }
}
