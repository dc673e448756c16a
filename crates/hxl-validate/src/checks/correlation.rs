use std::collections::HashMap;

use hxl_model::datatypes::normalise_string;
use hxl_model::{Row, TagPattern};

use super::{Failure, Finding, RuleTest};

#[derive(Debug, Clone)]
struct Tally {
    /// First spelling seen, used as the suggestion.
    original: String,
    count: usize,
    first_seen: usize,
}

/// Values of the rule's column must be consistent for each value of a
/// correlated column.
///
/// For every value of the correlated column the test remembers which rule
/// values it has been paired with. A pairing that differs from an earlier
/// one is an error; the most frequent earlier rule value is suggested.
#[derive(Debug, Clone)]
pub struct CorrelationTest {
    correlation: TagPattern,
    seen: HashMap<String, HashMap<String, Tally>>,
    order: usize,
}

impl CorrelationTest {
    pub fn new(correlation: TagPattern) -> Self {
        Self {
            correlation,
            seen: HashMap::new(),
            order: 0,
        }
    }

    pub fn correlation(&self) -> &TagPattern {
        &self.correlation
    }
}

impl RuleTest for CorrelationTest {
    fn start(&mut self) {
        self.seen.clear();
        self.order = 0;
    }

    fn validate_row(&mut self, row: &Row, pattern: &TagPattern) -> Vec<Finding> {
        let Some(index) = pattern.find_column_index(&row.columns) else {
            return Vec::new();
        };
        let value = row.value(index).unwrap_or_default();
        let key = normalise_string(self.correlation.get_value(row).unwrap_or_default());
        let normalised = normalise_string(value);
        if key.is_empty() || normalised.is_empty() {
            return Vec::new();
        }

        let order = self.order;
        self.order += 1;
        let tallies = self.seen.entry(key).or_default();
        let finding = if tallies.is_empty() || tallies.contains_key(&normalised) {
            None
        } else {
            let suggestion = tallies
                .values()
                .max_by(|a, b| a.count.cmp(&b.count).then(b.first_seen.cmp(&a.first_seen)))
                .map(|tally| tally.original.clone());
            let message = format!("Inconsistent with {}", self.correlation);
            Some(Finding::at(
                index,
                value,
                Failure::new(message).with_suggestion(suggestion),
            ))
        };
        tallies
            .entry(normalised)
            .or_insert_with(|| Tally {
                original: value.trim().to_string(),
                count: 0,
                first_seen: order,
            })
            .count += 1;
        finding.into_iter().collect()
    }
}
