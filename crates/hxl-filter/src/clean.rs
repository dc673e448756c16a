//! Value normalisation: whitespace, case, dates and numbers.

use std::sync::{Arc, LazyLock};

use hxl_model::datatypes::{is_date_column, is_number_column, normalise_date, normalise_whitespace};
use hxl_model::{Column, Dataset, Row, Rows, TagPattern, matches_any};
use regex::Regex;
use tracing::{debug, warn};

static NON_NUMBER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.]").expect("Invalid number cleanup regex"));

/// Which columns a cleaning operation applies to.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    None,
    /// Every column of the appropriate kind.
    All,
    Patterns(Vec<TagPattern>),
}

impl Selection {
    fn selects(&self, column: &Column, kind: fn(&Column) -> bool) -> bool {
        match self {
            Self::None => false,
            Self::All => kind(column),
            Self::Patterns(patterns) => matches_any(patterns, column),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<Vec<TagPattern>> for Selection {
    fn from(patterns: Vec<TagPattern>) -> Self {
        if patterns.is_empty() {
            Self::None
        } else {
            Self::Patterns(patterns)
        }
    }
}

/// Cleaning selections. `All` means every tagged column, except for dates
/// (`#date` or `*_date`) and numbers (`*_num` or `+num`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanOptions {
    pub whitespace: Selection,
    pub upper: Selection,
    pub lower: Selection,
    pub date: Selection,
    pub number: Selection,
}

#[derive(Debug, Clone, Copy, Default)]
struct ColumnPlan {
    whitespace: bool,
    upper: bool,
    lower: bool,
    date: bool,
    number: bool,
}

impl ColumnPlan {
    fn is_noop(self) -> bool {
        !(self.whitespace || self.upper || self.lower || self.date || self.number)
    }
}

/// Streams rows with selected values cleaned. Columns pass through unchanged.
pub struct CleanFilter<S> {
    source: S,
    options: CleanOptions,
}

impl<S: Dataset> CleanFilter<S> {
    pub fn new(source: S, options: CleanOptions) -> Self {
        Self { source, options }
    }

    fn plan(&self, columns: &[Column]) -> Vec<ColumnPlan> {
        let tagged: fn(&Column) -> bool = Column::is_tagged;
        columns
            .iter()
            .map(|column| ColumnPlan {
                whitespace: self.options.whitespace.selects(column, tagged),
                upper: self.options.upper.selects(column, tagged),
                lower: self.options.lower.selects(column, tagged),
                date: self.options.date.selects(column, is_date_column),
                number: self.options.number.selects(column, is_number_column),
            })
            .collect()
    }
}

fn clean_value(value: &str, plan: ColumnPlan) -> String {
    let mut value = value.to_string();
    if plan.whitespace {
        value = normalise_whitespace(&value);
    }
    if plan.upper {
        value = value.to_uppercase();
    }
    if plan.lower {
        value = value.to_lowercase();
    }
    if plan.date && !value.trim().is_empty() {
        match normalise_date(&value) {
            Some(date) => value = date,
            None => warn!(value = %value, "unparseable date left unchanged"),
        }
    }
    if plan.number && value.trim_start().starts_with(|ch: char| ch.is_ascii_digit()) {
        value = clean_number(&value);
    }
    value
}

/// Strip everything but digits and `.`, then drop redundant zeros.
pub fn clean_number(value: &str) -> String {
    let digits = NON_NUMBER_CHARS.replace_all(value, "");
    let mut out = digits.trim_start_matches('0').to_string();
    if out.contains('.') {
        out.truncate(out.trim_end_matches('0').len());
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out.is_empty() || out.starts_with('.') {
        out.insert(0, '0');
    }
    out
}

impl<S: Dataset> Dataset for CleanFilter<S> {
    fn columns(&self) -> Arc<[Column]> {
        self.source.columns()
    }

    fn rows(&self) -> Rows<'_> {
        let plan = self.plan(&self.source.columns());
        if plan.iter().all(|p| p.is_noop()) {
            debug!("clean filter selects no columns");
        }
        Box::new(self.source.rows().map(move |row| {
            let Row {
                columns,
                mut values,
                row_number,
                source_row_number,
            } = row;
            let width = values.len().min(plan.len());
            for (value, column_plan) in values.iter_mut().zip(&plan).take(width) {
                if !column_plan.is_noop() {
                    *value = clean_value(value, *column_plan);
                }
            }
            Row::new(columns, values, row_number, source_row_number)
        }))
    }
}
