use thiserror::Error;

/// Error type for pgstore operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Batch too large: {actual} rows, limit is {limit}")]
    BatchTooLarge { limit: usize, actual: usize },

    #[error("Field set is empty")]
    EmptyFieldSet,

    #[error("Row {index} does not have the same columns as the first row of the batch")]
    MismatchedColumns { index: usize },

    #[error("Statement needs {count} bind parameters, limit is {limit}")]
    TooManyParameters { count: usize, limit: usize },

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Expected {expected} row(s), got {actual}")]
    UnexpectedRowCount { expected: usize, actual: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Unsupported type {type_name} for column {column}")]
    UnsupportedType { column: String, type_name: String },
}

impl StoreError {
    /// Returns true for errors raised while checking caller input,
    /// before any connection is opened.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::BatchTooLarge { .. }
                | StoreError::EmptyFieldSet
                | StoreError::MismatchedColumns { .. }
                | StoreError::TooManyParameters { .. }
                | StoreError::InvalidIdentifier(_)
        )
    }
}

/// Result type alias for pgstore operations
pub type Result<T> = std::result::Result<T, StoreError>;
