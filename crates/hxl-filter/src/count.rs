//! Grouped counting and numeric aggregation.

use std::cell::OnceCell;
use std::collections::{BTreeMap, btree_map};
use std::sync::Arc;

use hxl_model::datatypes::{format_number, parse_number};
use hxl_model::{Column, Dataset, Row, Rows, TagPattern};
use tracing::debug;

use crate::error::{FilterError, Result};

/// Running statistics for one group.
///
/// `average` is refreshed on every numeric value so it is always `sum / count`
/// for the rows seen so far, where `count` includes rows without a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregator {
    pub count: usize,
    pub sum: f64,
    pub average: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub seen_numbers: bool,
}

impl Aggregator {
    /// Count a row, folding `value` into the numeric aggregates when it parses.
    pub fn add(&mut self, value: Option<&str>) {
        self.count += 1;
        let Some(n) = value.and_then(parse_number) else {
            return;
        };
        self.sum += n;
        self.average = self.sum / self.count as f64;
        self.min = Some(self.min.map_or(n, |min| min.min(n)));
        self.max = Some(self.max.map_or(n, |max| max.max(n)));
        self.seen_numbers = true;
    }

    /// Sum, average, min and max as strings; empty when no number was seen.
    pub fn numeric_values(&self) -> [String; 4] {
        if !self.seen_numbers {
            return Default::default();
        }
        [
            format_number(self.sum),
            format_number(self.average),
            self.min.map(format_number).unwrap_or_default(),
            self.max.map(format_number).unwrap_or_default(),
        ]
    }
}

/// Groups rows by the values of `patterns` and emits one row per group,
/// sorted by the group key. Reads the whole source before the first row.
pub struct CountFilter<S> {
    source: S,
    patterns: Vec<TagPattern>,
    aggregate: Option<TagPattern>,
    columns: OnceCell<Arc<[Column]>>,
}

impl<S: Dataset> CountFilter<S> {
    pub fn new(source: S, patterns: Vec<TagPattern>, aggregate: Option<TagPattern>) -> Result<Self> {
        if patterns.is_empty() {
            return Err(FilterError::NoCountPatterns);
        }
        Ok(Self {
            source,
            patterns,
            aggregate,
            columns: OnceCell::new(),
        })
    }

    fn aggregate_groups(&self) -> BTreeMap<Vec<String>, Aggregator> {
        let mut groups: BTreeMap<Vec<String>, Aggregator> = BTreeMap::new();
        for row in self.source.rows() {
            let key: Vec<String> = self
                .patterns
                .iter()
                .map(|pattern| pattern.get_value(&row).unwrap_or_default().to_string())
                .collect();
            let value = self.aggregate.as_ref().and_then(|pattern| pattern.get_value(&row));
            groups.entry(key).or_default().add(value);
        }
        debug!(groups = groups.len(), "aggregated source rows");
        groups
    }
}

fn generated(tag: &str, header: &str) -> Column {
    Column {
        tag: Some(tag.to_string()),
        header: Some(header.to_string()),
        ..Column::default()
    }
}

impl<S: Dataset> Dataset for CountFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(self.columns.get_or_init(|| {
            let source = self.source.columns();
            let mut columns: Vec<Column> = self
                .patterns
                .iter()
                .map(|pattern| Column {
                    tag: Some(pattern.tag.clone()),
                    attributes: pattern.include_attributes.clone(),
                    header: pattern
                        .find_column(&source)
                        .and_then(|column| column.header.clone()),
                    column_number: None,
                })
                .collect();
            columns.push(generated("#x_count_num", "Count"));
            if self.aggregate.is_some() {
                columns.push(generated("#x_sum_num", "Sum"));
                columns.push(generated("#x_average_num", "Average (mean)"));
                columns.push(generated("#x_min_num", "Minimum value"));
                columns.push(generated("#x_max_num", "Maximum value"));
            }
            columns.into()
        }))
    }

    fn rows(&self) -> Rows<'_> {
        let columns = self.columns();
        let with_aggregates = self.aggregate.is_some();
        let mut groups: Option<btree_map::IntoIter<Vec<String>, Aggregator>> = None;
        let mut row_number = 0usize;
        Box::new(std::iter::from_fn(move || {
            let iter = groups.get_or_insert_with(|| self.aggregate_groups().into_iter());
            let (mut values, aggregator) = iter.next()?;
            values.push(aggregator.count.to_string());
            if with_aggregates {
                values.extend(aggregator.numeric_values());
            }
            let row = Row::new(Arc::clone(&columns), values, row_number, None);
            row_number += 1;
            Some(row)
        }))
    }
}
