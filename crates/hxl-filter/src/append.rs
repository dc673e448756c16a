use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

use hxl_model::datatypes::normalise_string;
use hxl_model::{Column, Dataset, Row, Rows};
use tracing::debug;

/// How a column is recognised across datasets: display tag, or header text
/// for untagged columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ColumnKey {
    Tagged(String),
    Untagged(String),
}

impl ColumnKey {
    fn of(column: &Column) -> Self {
        match column.display_tag() {
            Some(tag) => Self::Tagged(tag),
            None => Self::Untagged(normalise_string(column.header.as_deref().unwrap_or_default())),
        }
    }
}

struct AppendPlan {
    columns: Arc<[Column]>,
    /// Output position of each appended column, `None` when dropped.
    mapping: Vec<Option<usize>>,
}

/// Emits the source rows, then the rows of `append` re-aligned to the
/// unified column list.
///
/// Appended columns are matched to source columns by tag and attributes (or
/// header when untagged); the n-th repeat matches the n-th repeat. Unmatched
/// columns are added at the end when `add_columns` is set, otherwise dropped.
pub struct AppendFilter<S, A> {
    source: S,
    append: A,
    add_columns: bool,
    plan: OnceCell<AppendPlan>,
}

impl<S: Dataset, A: Dataset> AppendFilter<S, A> {
    pub fn new(source: S, append: A, add_columns: bool) -> Self {
        Self {
            source,
            append,
            add_columns,
            plan: OnceCell::new(),
        }
    }

    fn plan(&self) -> &AppendPlan {
        self.plan.get_or_init(|| {
            let mut columns: Vec<Column> = self.source.columns().to_vec();
            let mut positions: HashMap<ColumnKey, Vec<usize>> = HashMap::new();
            for (idx, column) in columns.iter().enumerate() {
                positions.entry(ColumnKey::of(column)).or_default().push(idx);
            }

            let mut seen: HashMap<ColumnKey, usize> = HashMap::new();
            let mut mapping = Vec::new();
            for column in self.append.columns().iter() {
                let key = ColumnKey::of(column);
                let occurrence = seen.entry(key.clone()).or_default();
                let existing = positions.get(&key).and_then(|found| found.get(*occurrence)).copied();
                *occurrence += 1;
                let target = match existing {
                    Some(idx) => Some(idx),
                    None if self.add_columns => {
                        columns.push(Column {
                            column_number: None,
                            ..column.clone()
                        });
                        let idx = columns.len() - 1;
                        positions.entry(key).or_default().push(idx);
                        Some(idx)
                    }
                    None => None,
                };
                mapping.push(target);
            }
            debug!(
                columns = columns.len(),
                dropped = mapping.iter().filter(|m| m.is_none()).count(),
                "append columns unified"
            );
            AppendPlan {
                columns: columns.into(),
                mapping,
            }
        })
    }
}

impl<S: Dataset, A: Dataset> Dataset for AppendFilter<S, A> {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(&self.plan().columns)
    }

    fn rows(&self) -> Rows<'_> {
        let plan = self.plan();
        let width = plan.columns.len();
        let source_width = self.source.columns().len();
        let first = self.source.rows().map(move |row| {
            let mut values = row.values;
            values.resize(source_width, String::new());
            values.resize(width, String::new());
            (values, row.source_row_number)
        });
        let second = self.append.rows().map(move |row| {
            let mut values = vec![String::new(); width];
            for (value, target) in row.values.into_iter().zip(&plan.mapping) {
                if let Some(idx) = target {
                    values[*idx] = value;
                }
            }
            (values, row.source_row_number)
        });
        Box::new(
            first
                .chain(second)
                .enumerate()
                .map(move |(row_number, (values, source_row_number))| {
                    Row::new(Arc::clone(&plan.columns), values, row_number, source_row_number)
                }),
        )
    }
}
