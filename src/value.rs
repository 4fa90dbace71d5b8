//! Column types and cell values.
//!
//! A store declares its column types once at construction. Every node holds
//! one [`CellValue`] per column, starting out [`CellValue::Empty`].
//!
//! # Examples
//!
//! ```
//! use treestore_rust::{CellValue, ColumnType};
//!
//! let name = CellValue::from("src");
//! assert_eq!(name.column_type(), Some(ColumnType::Text));
//! assert_eq!(name.as_text(), Some("src"));
//!
//! // Empty fits any column
//! assert_eq!(CellValue::Empty.column_type(), None);
//! ```

use std::fmt;

/// Declared type of a store column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Bool,
    Int,
    UInt,
    Float,
    Text,
}

impl ColumnType {
    /// Lowercase type name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value stored in a single cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Unset cell. Accepted by every column type.
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Type of the value, or `None` for [`CellValue::Empty`].
    #[must_use]
    pub const fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Empty => None,
            Self::Bool(_) => Some(ColumnType::Bool),
            Self::Int(_) => Some(ColumnType::Int),
            Self::UInt(_) => Some(ColumnType::UInt),
            Self::Float(_) => Some(ColumnType::Float),
            Self::Text(_) => Some(ColumnType::Text),
        }
    }

    /// Check whether this value may be stored in a column of type `ty`.
    #[must_use]
    pub fn fits(&self, ty: ColumnType) -> bool {
        self.column_type().is_none_or(|own| own == ty)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_uint(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u64> for CellValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}
