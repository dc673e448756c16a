//! Core HXL record model: columns, rows, tag patterns, row queries and the
//! [`Dataset`] contract every source and pipeline stage implements.

pub mod column;
pub mod dataset;
pub mod datatypes;
pub mod error;
pub mod pattern;
pub mod query;
pub mod row;

pub use column::{Column, is_token};
pub use dataset::{Dataset, Rows};
pub use error::{ModelError, Result};
pub use pattern::{TagPattern, WILDCARD_TAG, matches_any};
pub use query::{QueryOperator, RowQuery, compare_values};
pub use row::Row;
