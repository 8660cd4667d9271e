//! Tabular data for frameguard
//!
//! The validator only needs two capabilities from a table: listing column
//! names and reading a column's cells. Those live in the `Table` trait so
//! other containers can be validated; `DataFrame` is the bundled
//! implementation.

mod errors;
mod frame;
mod value;

pub use errors::{TableError, TableResult};
pub use frame::{observed_types, Column, DataFrame};
pub use value::Value;

use std::collections::BTreeSet;

use crate::schema::FieldType;

/// Capability contract for anything the schema validator can inspect.
pub trait Table {
    /// Names of all columns.
    fn column_names(&self) -> Vec<&str>;

    /// Cells of the named column, or `None` if absent.
    fn column_values(&self, name: &str) -> Option<&[Value]>;

    /// Distinct non-null types observed in the named column.
    fn observed_types(&self, name: &str) -> Option<BTreeSet<FieldType>> {
        self.column_values(name).map(observed_types)
    }
}

impl Table for DataFrame {
    fn column_names(&self) -> Vec<&str> {
        DataFrame::column_names(self)
    }

    fn column_values(&self, name: &str) -> Option<&[Value]> {
        self.column(name).map(Column::values)
    }
}
