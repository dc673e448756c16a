use std::collections::HashSet;

use hxl_model::datatypes::normalise_string;
use hxl_model::{Row, TagPattern};

use super::{Failure, Finding, RuleTest};

/// Values (or compound keys) may appear only once per dataset.
///
/// Without key patterns the rule's own value is the key. Rows whose key is
/// entirely empty are skipped.
#[derive(Debug, Clone, Default)]
pub struct UniqueTest {
    keys: Vec<TagPattern>,
    seen: HashSet<Vec<String>>,
}

impl UniqueTest {
    pub fn new(keys: Vec<TagPattern>) -> Self {
        Self {
            keys,
            seen: HashSet::new(),
        }
    }

    pub fn keys(&self) -> &[TagPattern] {
        &self.keys
    }
}

impl RuleTest for UniqueTest {
    fn start(&mut self) {
        self.seen.clear();
    }

    fn validate_row(&mut self, row: &Row, pattern: &TagPattern) -> Vec<Finding> {
        let Some(index) = pattern.find_column_index(&row.columns) else {
            return Vec::new();
        };
        let value = row.value(index).unwrap_or_default();
        let key: Vec<String> = if self.keys.is_empty() {
            vec![normalise_string(value)]
        } else {
            self.keys
                .iter()
                .map(|key| normalise_string(key.get_value(row).unwrap_or_default()))
                .collect()
        };
        if key.iter().all(String::is_empty) || self.seen.insert(key) {
            return Vec::new();
        }
        let message = if self.keys.is_empty() {
            "Duplicate value".to_string()
        } else {
            let names: Vec<String> = self.keys.iter().map(ToString::to_string).collect();
            format!("Duplicate key ({})", names.join(", "))
        };
        vec![Finding::at(index, value, Failure::new(message))]
    }
}
