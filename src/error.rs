use std::num::{ParseFloatError, ParseIntError};

use bincode::ErrorKind;
use thiserror::Error;

/// Custom Result type for RustDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for RustDB
///
/// Every error is a local failure of the statement being executed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Statement does not match the grammar, or a sub-clause is malformed
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Unknown table/column/index, or a name collision on creation
    #[error("schema error: {0}")]
    Schema(String),
    /// NULL violation, type mismatch or uniqueness violation
    #[error("constraint error: {0}")]
    Constraint(String),
    /// Leading keyword not recognized
    #[error("unsupported statement: {0}")]
    Unsupported(String),
    /// Internal error (snapshot I/O, serialization, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ParseIntError> for Error {
    fn from(value: ParseIntError) -> Self {
        Error::Syntax(value.to_string())
    }
}

impl From<ParseFloatError> for Error {
    fn from(value: ParseFloatError) -> Self {
        Error::Syntax(value.to_string())
    }
}

impl From<Box<ErrorKind>> for Error {
    fn from(value: Box<ErrorKind>) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Internal(value.to_string())
    }
}
