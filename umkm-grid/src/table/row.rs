//! Row trait and typed cell values.

use std::fmt;
use std::hash::Hash;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A value read out of a row by a column accessor.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Missing value; the column's default content is shown instead.
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Decimal(value) => write!(f, "{}", value),
            FieldValue::Bool(value) => f.write_str(if *value { "Yes" } else { "No" }),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A record shown as one table row.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone)]
/// struct Business {
///     id: Option<u32>,
///     name: String,
/// }
///
/// impl TableRow for Business {
///     type Key = u32;
///
///     fn key(&self) -> Option<u32> {
///         self.id
///     }
/// }
/// ```
pub trait TableRow: Clone + Send + Sync + 'static {
    /// Identifier used for selection.
    type Key: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static;

    /// Unique key of this row. Rows without a key cannot be selected.
    fn key(&self) -> Option<Self::Key>;
}
