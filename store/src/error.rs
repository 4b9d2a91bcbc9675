//! Store errors.

use std::fmt;

use value::ValueError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a document store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A collection or document path could not be built.
    InvalidPath(ValueError),

    /// The store could not serve the request.
    Unavailable { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath(e) => write!(f, "invalid path: {e}"),
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPath(e) => Some(e),
            Self::Unavailable { .. } => None,
        }
    }
}

impl From<ValueError> for StoreError {
    fn from(err: ValueError) -> Self {
        Self::InvalidPath(err)
    }
}
