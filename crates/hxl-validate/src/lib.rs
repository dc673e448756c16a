//! Schema validation for HXL datasets.
//!
//! A [`Schema`] is a list of [`SchemaRule`]s, each pairing a tag pattern with
//! [`checks`] run against matching cells, rows and columns. Failures stream
//! to a callback as [`ValidationError`]s or are gathered into a
//! [`ValidationReport`].

pub mod checks;
pub mod error;
pub mod report;
pub mod rule;
pub mod schema;
mod util;

pub use checks::{Datatype, RuleTest};
pub use error::{Result, SchemaError};
pub use report::{Severity, ValidationIssue, ValidationReport};
pub use rule::{Callback, SchemaRule, ValidationError};
pub use schema::{DEFAULT_SCHEMA_ROWS, Schema};
pub use util::edit_distance;
