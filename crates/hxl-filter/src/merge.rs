//! Key-based merge of columns from a second dataset.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

use hxl_model::datatypes::normalise_string;
use hxl_model::{Column, Dataset, Row, Rows, TagPattern, matches_any};
use tracing::debug;

/// Merge behaviour flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Fill empty cells of an existing attribute-equal column instead of adding a new one.
    pub replace: bool,
    /// With `replace`, also overwrite non-empty cells when the merged value is non-empty.
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy)]
enum MergeTarget {
    Added(usize),
    Existing(usize),
}

struct MergePlan {
    columns: Arc<[Column]>,
    source_width: usize,
    /// (index in the merge dataset, destination in the output row)
    targets: Vec<(usize, MergeTarget)>,
}

/// Adds the `tags` columns of `merge` to each source row whose `keys`
/// values match a merge row. The first merge row for a key wins.
pub struct MergeDataFilter<S, M> {
    source: S,
    merge: M,
    keys: Vec<TagPattern>,
    tags: Vec<TagPattern>,
    options: MergeOptions,
    plan: OnceCell<MergePlan>,
    index: OnceCell<HashMap<Vec<String>, Vec<String>>>,
}

fn key_for(keys: &[TagPattern], row: &Row) -> Option<Vec<String>> {
    let key: Vec<String> = keys
        .iter()
        .map(|pattern| normalise_string(pattern.get_value(row).unwrap_or_default()))
        .collect();
    key.iter().any(|value| !value.is_empty()).then_some(key)
}

impl<S: Dataset, M: Dataset> MergeDataFilter<S, M> {
    pub fn new(
        source: S,
        merge: M,
        keys: Vec<TagPattern>,
        tags: Vec<TagPattern>,
        options: MergeOptions,
    ) -> Self {
        Self {
            source,
            merge,
            keys,
            tags,
            options,
            plan: OnceCell::new(),
            index: OnceCell::new(),
        }
    }

    fn plan(&self) -> &MergePlan {
        self.plan.get_or_init(|| {
            let source = self.source.columns();
            let mut columns: Vec<Column> = source.to_vec();
            let mut targets = Vec::new();
            for (merge_idx, column) in self.merge.columns().iter().enumerate() {
                if !matches_any(&self.tags, column) {
                    continue;
                }
                let existing = self
                    .options
                    .replace
                    .then(|| source.iter().position(|c| c.is_attribute_equal(column)))
                    .flatten();
                let target = match existing {
                    Some(idx) => MergeTarget::Existing(idx),
                    None => {
                        columns.push(Column {
                            column_number: None,
                            ..column.clone()
                        });
                        MergeTarget::Added(columns.len() - 1)
                    }
                };
                targets.push((merge_idx, target));
            }
            debug!(
                merged = targets.len(),
                added = columns.len() - source.len(),
                "merge columns resolved"
            );
            MergePlan {
                source_width: source.len(),
                columns: columns.into(),
                targets,
            }
        })
    }

    /// Merge rows by normalised key; reads the whole merge dataset once.
    fn index(&self) -> &HashMap<Vec<String>, Vec<String>> {
        self.index.get_or_init(|| {
            let mut index = HashMap::new();
            for row in self.merge.rows() {
                if let Some(key) = key_for(&self.keys, &row) {
                    index.entry(key).or_insert(row.values);
                }
            }
            debug!(keys = index.len(), "merge index built");
            index
        })
    }
}

impl<S: Dataset, M: Dataset> Dataset for MergeDataFilter<S, M> {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(&self.plan().columns)
    }

    fn rows(&self) -> Rows<'_> {
        let plan = self.plan();
        let index = self.index();
        let options = self.options;
        Box::new(self.source.rows().map(move |row| {
            let merged = key_for(&self.keys, &row).and_then(|key| index.get(&key));
            let mut values = row.values;
            values.resize(plan.source_width, String::new());
            values.resize(plan.columns.len(), String::new());
            if let Some(merged) = merged {
                for &(merge_idx, target) in &plan.targets {
                    let incoming = merged.get(merge_idx).map(String::as_str).unwrap_or_default();
                    match target {
                        MergeTarget::Added(idx) => values[idx] = incoming.to_string(),
                        MergeTarget::Existing(idx) => {
                            let current = &values[idx];
                            if !incoming.is_empty()
                                && (current.trim().is_empty() || options.overwrite)
                            {
                                values[idx] = incoming.to_string();
                            }
                        }
                    }
                }
            }
            Row::new(
                Arc::clone(&plan.columns),
                values,
                row.row_number,
                row.source_row_number,
            )
        }))
    }
}
