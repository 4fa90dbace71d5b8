//! Error types for tree store operations.

use crate::value::ColumnType;
use std::fmt;

/// Result type alias for tree store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a [`TreePosition`](crate::TreePosition) was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidPositionKind {
    /// The handle was produced by a different store.
    ForeignStore,
    /// The node the handle points at has been removed (or the store cleared).
    Removed,
}

/// Error type for tree store operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Column index outside the declared column list.
    OutOfRange { column: usize, columns: usize },
    /// Operation is deliberately not provided by this store.
    NotImplemented(&'static str),
    /// Handle does not resolve to a live node of this store.
    InvalidPosition(InvalidPositionKind),
    /// Value type does not match the declared column type.
    TypeMismatch {
        column: usize,
        expected: ColumnType,
        found: ColumnType,
    },
    /// Storage was built for a different number of columns than declared.
    ColumnCountMismatch { declared: usize, storage: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { column, columns } => {
                write!(f, "column {column} out of range for {columns} columns")
            }
            Self::NotImplemented(op) => write!(f, "{op} is not implemented"),
            Self::InvalidPosition(InvalidPositionKind::ForeignStore) => {
                write!(f, "invalid position: handle belongs to another store")
            }
            Self::InvalidPosition(InvalidPositionKind::Removed) => {
                write!(f, "invalid position: node no longer exists")
            }
            Self::TypeMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "type mismatch in column {column}: expected {expected}, found {found}"
            ),
            Self::ColumnCountMismatch { declared, storage } => write!(
                f,
                "declared {declared} columns but storage holds {storage}"
            ),
        }
    }
}

impl std::error::Error for Error {}
