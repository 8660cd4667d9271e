//! Schema type definitions
//!
//! Supported column types:
//! - integer: 64-bit signed integer
//! - float: 64-bit floating point
//! - text: UTF-8 string
//! - boolean: Boolean
//! - timestamp: UTC timestamp
//! - object: generic type every other type satisfies

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Semantic column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 64-bit signed integer
    #[serde(alias = "int")]
    Integer,
    /// 64-bit floating point
    Float,
    /// UTF-8 string
    #[serde(alias = "str", alias = "string")]
    Text,
    /// Boolean
    #[serde(alias = "bool")]
    Boolean,
    /// UTC timestamp
    #[serde(alias = "datetime")]
    Timestamp,
    /// Generic type
    #[serde(alias = "any")]
    Object,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Compatibility table deciding when an observed type satisfies an
/// expected one.
///
/// Identity always matches and every type satisfies `Object`. The two
/// numeric widenings are opt-in and both default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtypePolicy {
    /// Accept boolean cells where an integer column is expected
    pub bool_as_integer: bool,
    /// Accept integer cells where a float column is expected
    pub integer_as_float: bool,
}

impl SubtypePolicy {
    /// Identity and `Object` only.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Returns true if a value of type `observed` satisfies `expected`.
    pub fn is_subtype(&self, observed: FieldType, expected: FieldType) -> bool {
        if observed == expected {
            return true;
        }

        match (observed, expected) {
            (_, FieldType::Object) => true,
            (FieldType::Boolean, FieldType::Integer) => self.bool_as_integer,
            (FieldType::Integer, FieldType::Float) => self.integer_as_float,
            (FieldType::Boolean, FieldType::Float) => {
                self.bool_as_integer && self.integer_as_float
            }
            _ => false,
        }
    }
}

/// Mapping from column name to expected type.
///
/// Backed by a `BTreeMap` so iteration (and therefore error reporting)
/// follows column-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: BTreeMap<String, FieldType>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column declaration
    pub fn with_column(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.insert(name, field_type);
        self
    }

    /// Declares a column, returning the previous type if it was declared.
    pub fn insert(&mut self, name: impl Into<String>, field_type: FieldType) -> Option<FieldType> {
        self.columns.insert(name.into(), field_type)
    }

    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Declared columns in name order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, FieldType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, FieldType)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(name, ty)| (name.into(), ty)).collect(),
        }
    }
}

/// Describes a schema as a fixed list of named fields.
///
/// ```ignore
/// struct Users;
///
/// impl DescribeSchema for Users {
///     const FIELDS: &'static [(&'static str, FieldType)] = &[
///         ("id", FieldType::Integer),
///         ("name", FieldType::Text),
///     ];
/// }
///
/// let schema = Users::schema();
/// ```
pub trait DescribeSchema {
    /// Field names and their expected types.
    const FIELDS: &'static [(&'static str, FieldType)];

    /// Collects `FIELDS` into a `Schema`.
    fn schema() -> Schema {
        Self::FIELDS.iter().copied().collect()
    }
}

/// Builds a `Schema` from `"name" => Type` pairs.
///
/// ```ignore
/// let schema = schema! {
///     "id" => Integer,
///     "name" => Text,
/// };
/// ```
#[macro_export]
macro_rules! schema {
    ($($name:expr => $ty:ident),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut schema = $crate::schema::Schema::new();
            $(
                schema.insert($name, $crate::schema::FieldType::$ty);
            )*
            schema
        }
    };
}
