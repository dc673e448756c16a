//! Schemas: ordered rule lists, loaded from HXL data or built in code.

use hxl_ingest::MemoryDataset;
use hxl_model::datatypes::is_truthy;
use hxl_model::{Column, Dataset, Row, TagPattern};
use tracing::{debug, info};

use crate::checks::{
    ConsistentDatatypeTest, CorrelationTest, DatatypeTest, EnumerationTest, RangeTest, RegexTest,
    RequiredTest, UniqueTest, WhitespaceTest,
};
use crate::error::{Result, SchemaError};
use crate::report::{Severity, ValidationReport};
use crate::rule::{Callback, SchemaRule, ValidationError};

/// Built-in schema used when none is supplied: one rule per row under a
/// header of control tags, in the same layout a schema file uses.
pub const DEFAULT_SCHEMA_ROWS: &[&[&str]] = &[
    &["Tag", "Datatype", "Minimum", "Maximum", "Severity", "Description"],
    &[
        "#valid_tag",
        "#valid_datatype",
        "#valid_value+min",
        "#valid_value+max",
        "#valid_severity",
        "#description",
    ],
    &["#affected", "number", "0", "", "error", "Affected people must be a non-negative number"],
    &["#inneed", "number", "0", "", "error", "People in need must be a non-negative number"],
    &["#targeted", "number", "0", "", "error", "Targeted people must be a non-negative number"],
    &["#reached", "number", "0", "", "error", "Reached people must be a non-negative number"],
    &["#population", "number", "0", "", "error", "Population must be a non-negative number"],
    &["#geo+lat", "number", "-90", "90", "error", "Latitude must be between -90 and 90"],
    &["#geo+lon", "number", "-180", "180", "error", "Longitude must be between -180 and 180"],
    &["#date", "date", "", "", "error", "Dates must be recognisable"],
    &["#contact+email", "email", "", "", "warning", "Contact emails should be well formed"],
    &["#contact+phone", "phone", "", "", "warning", "Contact phone numbers should be well formed"],
];

/// Control columns recognised in a schema dataset.
struct ControlTags {
    tag: TagPattern,
    severity: TagPattern,
    description: TagPattern,
    required: TagPattern,
    required_min: TagPattern,
    required_max: TagPattern,
    datatype: TagPattern,
    consistent: TagPattern,
    value_min: TagPattern,
    value_max: TagPattern,
    value_list: TagPattern,
    value_case: TagPattern,
    value_regex: TagPattern,
    whitespace: TagPattern,
    unique: TagPattern,
    unique_key: TagPattern,
    correlation: TagPattern,
}

impl ControlTags {
    fn new() -> Result<Self> {
        let p = TagPattern::parse;
        Ok(Self {
            tag: p("#valid_tag")?,
            severity: p("#valid_severity")?,
            description: p("#description")?,
            required: p("#valid_required-min-max")?,
            required_min: p("#valid_required+min")?,
            required_max: p("#valid_required+max")?,
            datatype: p("#valid_datatype-consistent")?,
            consistent: p("#valid_datatype+consistent")?,
            value_min: p("#valid_value+min")?,
            value_max: p("#valid_value+max")?,
            value_list: p("#valid_value+list")?,
            value_case: p("#valid_value+case")?,
            value_regex: p("#valid_value+regex")?,
            whitespace: p("#valid_value+whitespace")?,
            unique: p("#valid_unique-key")?,
            unique_key: p("#valid_unique+key")?,
            correlation: p("#valid_correlation")?,
        })
    }

    fn rule(&self, row: &Row) -> Result<Option<SchemaRule>> {
        let get = |pattern: &TagPattern| {
            pattern
                .get_value(row)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };
        let invalid = |message: String| SchemaError::InvalidRule {
            row: row.row_number,
            message,
        };

        let Some(tag) = get(&self.tag) else {
            return Ok(None);
        };
        let mut rule = SchemaRule::new(TagPattern::parse(tag)?);

        if let Some(severity) = get(&self.severity) {
            rule = rule.with_severity(
                Severity::parse(severity)
                    .ok_or_else(|| SchemaError::InvalidSeverity(severity.to_string()))?,
            );
        }
        if let Some(description) = get(&self.description) {
            rule = rule.with_description(description);
        }

        let count = |pattern: &TagPattern| -> Result<Option<usize>> {
            get(pattern)
                .map(|value| {
                    value
                        .parse::<usize>()
                        .map_err(|_| invalid(format!("expected a whole number for {pattern}, got '{value}'")))
                })
                .transpose()
        };
        let mut min_occurs = count(&self.required_min)?;
        let max_occurs = count(&self.required_max)?;
        if min_occurs.is_none() && get(&self.required).is_some_and(is_truthy) {
            min_occurs = Some(1);
        }
        if min_occurs.is_some() || max_occurs.is_some() {
            rule = rule.with_test(RequiredTest::new(min_occurs, max_occurs));
        }

        if let Some(name) = get(&self.datatype) {
            rule = rule.with_test(DatatypeTest::new(name)?);
        }
        if get(&self.consistent).is_some_and(is_truthy) {
            rule = rule.with_test(ConsistentDatatypeTest::default());
        }

        let min_value = get(&self.value_min).map(String::from);
        let max_value = get(&self.value_max).map(String::from);
        if min_value.is_some() || max_value.is_some() {
            rule = rule.with_test(RangeTest::new(min_value, max_value));
        }
        if let Some(list) = get(&self.value_list) {
            let case_sensitive = get(&self.value_case).is_some_and(is_truthy);
            rule = rule.with_test(EnumerationTest::parse(list, case_sensitive));
        }
        if let Some(pattern) = get(&self.value_regex) {
            rule = rule.with_test(RegexTest::new(pattern)?);
        }
        if get(&self.whitespace).is_some_and(is_truthy) {
            rule = rule.with_test(WhitespaceTest);
        }

        if let Some(keys) = get(&self.unique_key) {
            rule = rule.with_test(UniqueTest::new(TagPattern::parse_list(keys)?));
        } else if get(&self.unique).is_some_and(is_truthy) {
            rule = rule.with_test(UniqueTest::default());
        }
        if let Some(correlation) = get(&self.correlation) {
            rule = rule.with_test(CorrelationTest::new(TagPattern::parse(correlation)?));
        }

        Ok(Some(rule))
    }
}

/// An ordered list of rules, plus an optional callback that sees every
/// failure as it is found.
pub struct Schema<'cb> {
    pub rules: Vec<SchemaRule>,
    callback: Option<Box<Callback<'cb>>>,
}

impl std::fmt::Debug for Schema<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("rules", &self.rules)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl<'cb> Schema<'cb> {
    pub fn new(rules: Vec<SchemaRule>) -> Self {
        Self {
            rules,
            callback: None,
        }
    }

    /// Read rules from a dataset whose columns carry `#valid_*` control tags.
    /// Rows without a `#valid_tag` value are ignored.
    pub fn from_dataset<D: Dataset + ?Sized>(dataset: &D) -> Result<Self> {
        let control = ControlTags::new()?;
        if control.tag.find_column_index(&dataset.columns()).is_none() {
            return Err(SchemaError::MissingTagColumn);
        }
        let mut rules = Vec::new();
        for row in dataset.rows() {
            if let Some(rule) = control.rule(&row)? {
                rules.push(rule);
            }
        }
        debug!(rules = rules.len(), "schema loaded");
        Ok(Self::new(rules))
    }

    /// The built-in schema from [`DEFAULT_SCHEMA_ROWS`].
    pub fn default_schema() -> Result<Self> {
        let raw = DEFAULT_SCHEMA_ROWS
            .iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect();
        Self::from_dataset(&MemoryDataset::from_raw(raw)?)
    }

    /// Replace the callback. Every failure is passed to it as it is found.
    pub fn with_callback<'a>(self, callback: impl FnMut(&ValidationError<'_>) + 'a) -> Schema<'a> {
        Schema {
            rules: self.rules,
            callback: Some(Box::new(callback)),
        }
    }

    /// Reset all rule state. Call before feeding rows by hand.
    pub fn start(&mut self) {
        for rule in &mut self.rules {
            rule.start();
        }
    }

    /// Apply every rule to one row. Returns `false` if any rule failed.
    pub fn validate_row(&mut self, row: &Row) -> bool {
        self.validate_row_with(row, &mut |_| {})
    }

    /// Apply the column-level checks. Returns `false` if any failed.
    pub fn validate_columns(&mut self, columns: &[Column]) -> bool {
        self.validate_columns_with(columns, &mut |_| {})
    }

    /// Column-level checks against a dataset's column list.
    pub fn validate_dataset<D: Dataset + ?Sized>(&mut self, dataset: &D) -> bool {
        self.validate_columns(&dataset.columns())
    }

    /// Full run: reset, every row, then the column-level checks.
    pub fn validate<D: Dataset + ?Sized>(&mut self, dataset: &D) -> bool {
        self.run(dataset, &mut |_| {}).0
    }

    /// Full run, collecting every failure into a report.
    pub fn validate_report<D: Dataset + ?Sized>(&mut self, dataset: &D) -> ValidationReport {
        let mut report = ValidationReport::new();
        let (_, rows) = self.run(dataset, &mut |error| report.issues.push(error.to_issue()));
        report.rows_validated = rows;
        info!(
            rows,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validation finished"
        );
        report
    }

    fn run<D: Dataset + ?Sized>(&mut self, dataset: &D, sink: &mut Callback<'_>) -> (bool, usize) {
        self.start();
        let mut valid = true;
        let mut rows = 0;
        for row in dataset.rows() {
            valid &= self.validate_row_with(&row, sink);
            rows += 1;
        }
        valid &= self.validate_columns_with(&dataset.columns(), sink);
        debug!(rows, valid, "schema run complete");
        (valid, rows)
    }

    fn validate_row_with(&mut self, row: &Row, sink: &mut Callback<'_>) -> bool {
        let Self { rules, callback } = self;
        let mut forward = |error: &ValidationError<'_>| {
            sink(error);
            if let Some(callback) = callback.as_mut() {
                callback(error);
            }
        };
        let mut valid = true;
        for rule in rules.iter_mut() {
            valid &= rule.validate_row(row, &mut forward);
        }
        valid
    }

    fn validate_columns_with(&mut self, columns: &[Column], sink: &mut Callback<'_>) -> bool {
        let Self { rules, callback } = self;
        let mut forward = |error: &ValidationError<'_>| {
            sink(error);
            if let Some(callback) = callback.as_mut() {
                callback(error);
            }
        };
        let mut valid = true;
        for rule in rules.iter_mut() {
            valid &= rule.validate_columns(columns, &mut forward);
        }
        valid
    }
}
