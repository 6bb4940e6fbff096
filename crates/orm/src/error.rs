//! Error types for the mapper core
//!
//! Provides error handling for query compilation and relation loading.
//! Out-of-range cursors and missing related records are absences, not
//! errors; only usage mistakes and collaborator failures surface here.

use std::fmt;

/// Result type alias for mapper operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Result type alias for query compilation
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for mapper operations
#[derive(Debug, Clone)]
pub enum OrmError {
    /// Database connection or query error reported by the executor
    Database(String),
    /// Record not found in database
    NotFound(String),
    /// Query compilation error
    Query(String),
    /// Relation loading failed
    Relation(String),
    /// Dialect or connection configuration error
    Configuration(String),
    /// Serialization/deserialization error
    Serialization(String),
}

impl fmt::Display for OrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrmError::Database(msg) => write!(f, "Database error: {}", msg),
            OrmError::NotFound(table) => write!(f, "Record not found in table '{}'", table),
            OrmError::Query(msg) => write!(f, "Query error: {}", msg),
            OrmError::Relation(msg) => write!(f, "Relation error: {}", msg),
            OrmError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            OrmError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for OrmError {}

// Convert from serde_json errors
impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        OrmError::Serialization(err.to_string())
    }
}

/// Error types for query compilation
///
/// These are usage errors: raised synchronously at the call that detected
/// them, never retried, always fatal to that single operation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Batch insert called with something other than a list of rows
    BatchShape,
    /// Batch insert row with a column count differing from the first row
    BatchRowCount(usize),
    /// Offset-fetch pagination requested without an order clause
    LimitWithoutOrder,
    /// Positional and named bind parameters mixed in one statement
    MixedParameters,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::BatchShape => write!(f, "Batch data should be a list of rows"),
            QueryError::BatchRowCount(row) => write!(f, "Invalid data count at row {}", row),
            QueryError::LimitWithoutOrder => {
                write!(f, "Unable to perform limit-offset without order clause")
            }
            QueryError::MixedParameters => {
                write!(f, "Cannot mix positional and named bind parameters")
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl From<QueryError> for OrmError {
    fn from(err: QueryError) -> Self {
        OrmError::Query(err.to_string())
    }
}

impl From<crate::dialect::DialectError> for OrmError {
    fn from(err: crate::dialect::DialectError) -> Self {
        OrmError::Configuration(err.to_string())
    }
}
