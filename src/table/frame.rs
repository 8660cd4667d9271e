//! In-memory column-oriented DataFrame
//!
//! Columns are kept in insertion order. All columns share one row count and
//! names are unique; every mutation that would break either rule fails with
//! a `TableError` and leaves the frame untouched.

use std::collections::BTreeSet;
use std::fmt;

use crate::schema::FieldType;

use super::errors::{TableError, TableResult};
use super::value::Value;

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Creates a column from anything convertible into cells.
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distinct semantic types among the non-missing cells.
    pub fn observed_types(&self) -> BTreeSet<FieldType> {
        observed_types(&self.values)
    }
}

/// Collects the distinct types of a column's values, skipping nulls and NaN.
pub fn observed_types(values: &[Value]) -> BTreeSet<FieldType> {
    values.iter().filter_map(Value::field_type).collect()
}

/// Column-oriented table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// Creates an empty frame with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frame from columns, rejecting duplicates and ragged lengths.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> TableResult<Self> {
        let mut frame = Self::new();
        for column in columns {
            if frame.has_column(column.name()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            frame.insert_column(column)?;
        }
        Ok(frame)
    }

    /// Builds a frame from a column-oriented JSON object: `{"col": [v, ...]}`.
    pub fn from_json(value: &serde_json::Value) -> TableResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| TableError::InvalidJson("expected an object of columns".into()))?;

        let mut columns = Vec::with_capacity(object.len());
        for (name, cells) in object {
            let cells = cells.as_array().ok_or_else(|| {
                TableError::InvalidJson(format!("column '{}' must be an array", name))
            })?;
            let values = cells
                .iter()
                .map(Value::from_json)
                .collect::<TableResult<Vec<_>>>()
                .map_err(|e| match e {
                    TableError::InvalidJson(reason) => {
                        TableError::InvalidJson(format!("column '{}': {}", name, reason))
                    }
                    other => other,
                })?;
            columns.push(Column {
                name: name.clone(),
                values,
            });
        }

        Self::from_columns(columns)
    }

    /// Parses a column-oriented JSON document.
    pub fn from_json_str(s: &str) -> TableResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| TableError::InvalidJson(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Number of rows (zero for a frame without columns).
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in frame order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Adds a column, replacing any existing column of the same name.
    pub fn insert_column(&mut self, column: Column) -> TableResult<()> {
        let replacing = self.has_column(column.name());
        let only_column = replacing && self.columns.len() == 1;

        if !self.columns.is_empty() && !only_column && column.len() != self.num_rows() {
            return Err(TableError::LengthMismatch {
                column: column.name,
                expected: self.num_rows(),
                actual: column.values.len(),
            });
        }

        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Builder form of `insert_column`.
    pub fn with_column(mut self, column: Column) -> TableResult<Self> {
        self.insert_column(column)?;
        Ok(self)
    }

    /// Removes the named columns. Every name must exist.
    pub fn drop_columns(mut self, names: &[&str]) -> TableResult<Self> {
        if let Some(unknown) = names.iter().find(|n| !self.has_column(n)) {
            return Err(TableError::UnknownColumn(unknown.to_string()));
        }
        self.columns.retain(|c| !names.contains(&c.name.as_str()));
        Ok(self)
    }

    /// Renames columns by `(from, to)` pairs.
    ///
    /// Pairs whose source column is absent are skipped. Fails if a rename
    /// would produce two columns with the same name.
    pub fn rename_columns(mut self, renames: &[(&str, &str)]) -> TableResult<Self> {
        for column in &mut self.columns {
            if let Some((_, to)) = renames.iter().find(|(from, _)| *from == column.name) {
                column.name = to.to_string();
            }
        }

        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(self)
    }

    /// Adds (or replaces) `target` by mapping every cell of `source`.
    pub fn derive_column<F>(self, source: &str, target: &str, f: F) -> TableResult<Self>
    where
        F: Fn(&Value) -> Value,
    {
        let values: Vec<Value> = self
            .column(source)
            .ok_or_else(|| TableError::UnknownColumn(source.to_string()))?
            .values
            .iter()
            .map(f)
            .collect();

        self.with_column(Column {
            name: target.to_string(),
            values,
        })
    }

    /// Iterates rows as cell references in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.num_rows()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.num_rows().saturating_sub(1).to_string().len();

        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.values.iter().map(ToString::to_string).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, rendered)| {
                rendered
                    .iter()
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(c.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:width$}", "", width = index_width)?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", column.name, width = width)?;
        }
        writeln!(f)?;

        for row in 0..self.num_rows() {
            write!(f, "{:<width$}", row, width = index_width)?;
            for (rendered, width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", rendered[row], width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> DataFrame {
        DataFrame::from_columns(vec![
            Column::new("id", [1, 2, 3]),
            Column::new("name", ["Alice", "Bob", "Charlie"]),
            Column::new("age", [25, 30, 35]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape() {
        let df = users();
        assert_eq!(df.num_rows(), 3);
        assert_eq!(df.num_columns(), 3);
        assert_eq!(df.column_names(), vec!["id", "name", "age"]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = DataFrame::from_columns(vec![
            Column::new("id", [1]),
            Column::new("id", [2]),
        ]);
        assert_eq!(result.unwrap_err(), TableError::DuplicateColumn("id".into()));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = DataFrame::from_columns(vec![
            Column::new("id", [1, 2]),
            Column::new("age", [30]),
        ]);
        assert!(matches!(result, Err(TableError::LengthMismatch { .. })));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut df = users();
        df.insert_column(Column::new("age", [1, 2, 3])).unwrap();
        assert_eq!(df.num_columns(), 3);
        assert_eq!(df.column("age").unwrap().values()[0], Value::Integer(1));
    }

    #[test]
    fn test_drop_unknown_column_fails() {
        let result = users().drop_columns(&["missing"]);
        assert_eq!(result.unwrap_err(), TableError::UnknownColumn("missing".into()));
    }

    #[test]
    fn test_rename_and_drop() {
        let df = users()
            .rename_columns(&[("id", "user_id"), ("name", "full_name"), ("nope", "x")])
            .unwrap()
            .drop_columns(&["age"])
            .unwrap();
        assert_eq!(df.column_names(), vec!["user_id", "full_name"]);
    }

    #[test]
    fn test_rename_collision_fails() {
        let result = users().rename_columns(&[("id", "age")]);
        assert_eq!(result.unwrap_err(), TableError::DuplicateColumn("age".into()));
    }

    #[test]
    fn test_derive_column() {
        let df = users()
            .derive_column("age", "age_plus_one", |v| {
                v.as_i64().map(|a| Value::Integer(a + 1)).unwrap_or(Value::Null)
            })
            .unwrap();
        assert_eq!(
            df.column("age_plus_one").unwrap().values(),
            &[Value::Integer(26), Value::Integer(31), Value::Integer(36)]
        );
    }

    #[test]
    fn test_observed_types_skip_nulls() {
        let column = Column::new("mixed", vec![Value::Null, Value::from(1), Value::from("a")]);
        let types = column.observed_types();
        assert_eq!(types.len(), 2);
        assert!(types.contains(&FieldType::Integer));
        assert!(types.contains(&FieldType::Text));

        let all_null = Column::new("empty", vec![Value::Null, Value::Null]);
        assert!(all_null.observed_types().is_empty());

        let with_nan = Column::new("age", vec![Value::from(1), Value::Float(f64::NAN)]);
        assert_eq!(
            with_nan.observed_types().into_iter().collect::<Vec<_>>(),
            vec![FieldType::Integer]
        );
    }

    #[test]
    fn test_rows() {
        let df = users();
        let rows: Vec<_> = df.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], &Value::Text("Bob".into()));
    }

    #[test]
    fn test_from_json() {
        let df = DataFrame::from_json(&json!({
            "id": [1, 2],
            "score": [1.5, null]
        }))
        .unwrap();
        assert_eq!(df.num_rows(), 2);
        assert_eq!(df.column("score").unwrap().values()[1], Value::Null);
    }

    #[test]
    fn test_from_json_rejects_oversized_integer() {
        let result = DataFrame::from_json(&json!({"id": [1, u64::MAX]}));
        match result {
            Err(TableError::InvalidJson(reason)) => assert!(reason.contains("column 'id'")),
            other => panic!("expected invalid json, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_non_array_column() {
        let result = DataFrame::from_json(&json!({"id": 1}));
        assert!(matches!(result, Err(TableError::InvalidJson(_))));
    }

    #[test]
    fn test_display_contains_header_and_values() {
        let rendered = users().to_string();
        assert!(rendered.contains("name"));
        assert!(rendered.contains("Charlie"));
        assert_eq!(rendered.lines().count(), 4);
    }

    #[test]
    fn test_display_aligns_non_ascii() {
        let df = DataFrame::from_columns(vec![
            Column::new("città", ["Zürich", "Oslo"]),
            Column::new("n", [1, 2]),
        ])
        .unwrap();
        let rendered = df.to_string();
        let widths: Vec<usize> = rendered.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{}", rendered);
    }
}
